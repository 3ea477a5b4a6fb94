//! Orbit camera model and eased focus transitions.
//!
//! The camera is stored in spherical form around a target point, which keeps
//! orbiting, dollying and re-targeting trivial. The engine side only needs
//! [`OrbitCamera::calculate_position`] and the target to build a look-at
//! transform.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{FOCUS_TRANSITION_SECONDS, FOCUS_VIEW_DISTANCE};
use crate::types::TargetSurface;

/// Pitch limit, just short of straight up or down
const MAX_PITCH: f32 = 1.5;

/// Camera orbit state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (yaw) in radians
    pub yaw: f32,
    /// Vertical angle (pitch) in radians
    pub pitch: f32,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Pan sensitivity (units per pixel, scaled by distance)
    pub pan_sensitivity: f32,
    /// Zoom sensitivity (distance units per wheel unit)
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Standing back from an object hung at 1.5 m, slightly above it
        Self {
            target: Vec3::new(0.0, 1.5, 0.0),
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.1,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 0.01,
            min_distance: 0.5,
            max_distance: 60.0,
        }
    }
}

impl OrbitCamera {
    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            target,
            ..Default::default()
        };
        camera.set_position(position);
        camera
    }

    /// Calculate camera position from orbit parameters
    pub fn calculate_position(&self) -> Vec3 {
        let horizontal_distance = self.distance * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let x = horizontal_distance * self.yaw.sin();
        let z = horizontal_distance * self.yaw.cos();

        self.target + Vec3::new(x, y, z)
    }

    /// Recompute distance, yaw and pitch so the camera sits at `position`
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Orbit by a pointer delta in pixels
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.orbit_sensitivity;
        self.pitch = (self.pitch - delta.y * self.orbit_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target in the camera's view plane
    pub fn pan(&mut self, delta: Vec2) {
        let forward = (self.target - self.calculate_position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let pan_scale = self.pan_sensitivity * self.distance;
        self.target += (-right * delta.x + up * delta.y) * pan_scale;
    }

    /// Change the distance by a wheel delta, clamped to the camera limits
    pub fn dolly(&mut self, delta: f32) {
        self.distance = (self.distance + delta * self.zoom_sensitivity).clamp(self.min_distance, self.max_distance);
    }

    /// Reset to default view
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Eased move of camera position and target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransition {
    pub from_position: Vec3,
    pub from_target: Vec3,
    pub to_position: Vec3,
    pub to_target: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl CameraTransition {
    pub fn new(camera: &OrbitCamera, to_position: Vec3, to_target: Vec3) -> Self {
        Self {
            from_position: camera.calculate_position(),
            from_target: camera.target,
            to_position,
            to_target,
            elapsed: 0.0,
            duration: FOCUS_TRANSITION_SECONDS,
        }
    }

    /// Camera move that frames a painting head-on from its viewing distance
    pub fn to_surface(camera: &OrbitCamera, surface: &TargetSurface) -> Self {
        let to_position = surface.position + surface.facing.normal() * FOCUS_VIEW_DISTANCE;
        Self::new(camera, to_position, surface.position)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and write the interpolated pose into `camera`.
    /// Returns true once the transition has completed.
    pub fn advance(&mut self, dt: f32, camera: &mut OrbitCamera) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        let t = if self.duration > 0.0 {
            ease_out_cubic(self.elapsed / self.duration)
        } else {
            1.0
        };
        camera.target = self.from_target.lerp(self.to_target, t);
        camera.set_position(self.from_position.lerp(self.to_position, t));
        self.is_finished()
    }
}
