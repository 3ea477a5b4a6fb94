//! Pointer interaction: object rotation with inertia, camera orbit, wheel
//! zoom, recentring and auto-follow.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sfumato_config::InteractionTuning;
use tracing::debug;

use crate::camera::OrbitCamera;
use crate::transform::ObjectPivot;

/// What a drag rotates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Drags orbit the camera around the object
    #[default]
    Camera,
    /// Drags rotate the object about its pivot
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Engine-agnostic pointer events, positions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerInput {
    Down { position: Vec2, button: PointerButton },
    Move { position: Vec2, shift: bool },
    Up,
    Leave,
    Wheel { delta: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last: Vec2 },
}

/// Interprets pointer input for one object and one camera
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    tuning: InteractionTuning,
    pub mode: RotationMode,
    pub drag: DragState,
    pub auto_rotate: bool,
    /// Angular velocity in radians per tick, per Euler axis
    pub velocity: Vec3,
}

impl InteractionController {
    pub fn new(tuning: InteractionTuning) -> Self {
        Self {
            tuning,
            mode: RotationMode::default(),
            drag: DragState::default(),
            auto_rotate: false,
            velocity: Vec3::ZERO,
        }
    }

    pub fn tuning(&self) -> &InteractionTuning {
        &self.tuning
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn set_mode(&mut self, mode: RotationMode) {
        if self.mode != mode {
            self.mode = mode;
            self.drag = DragState::Idle;
            self.velocity = Vec3::ZERO;
        }
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
        if !enabled {
            self.velocity = Vec3::ZERO;
        }
    }

    /// Apply one pointer event
    pub fn handle(&mut self, input: PointerInput, pivot: Option<&mut ObjectPivot>, camera: &mut OrbitCamera) {
        match input {
            PointerInput::Down {
                button: PointerButton::Middle,
                ..
            } => self.recenter(pivot, camera),
            PointerInput::Down { position, .. } => {
                self.drag = DragState::Dragging { last: position };
            }
            PointerInput::Move { position, shift } => {
                let DragState::Dragging { last } = self.drag else {
                    return;
                };
                let delta = position - last;
                self.drag = DragState::Dragging { last: position };
                self.drag_by(delta, shift, pivot, camera);
            }
            PointerInput::Up | PointerInput::Leave => {
                self.drag = DragState::Idle;
            }
            PointerInput::Wheel { delta } => match self.mode {
                RotationMode::Object => {
                    camera.distance = (camera.distance + delta * self.tuning.wheel_speed)
                        .clamp(self.tuning.min_distance, self.tuning.max_distance);
                }
                RotationMode::Camera => camera.dolly(delta),
            },
        }
    }

    fn drag_by(&mut self, delta: Vec2, shift: bool, pivot: Option<&mut ObjectPivot>, camera: &mut OrbitCamera) {
        match (self.mode, pivot) {
            (RotationMode::Object, Some(pivot)) => {
                let k = self.tuning.drag_speed;
                pivot.rotation.y += delta.x * k;
                pivot.rotation.x += delta.y * k;
                if shift {
                    pivot.rotation.z += delta.x * k;
                }

                if self.auto_rotate {
                    let s = self.tuning.inertia_scale;
                    self.velocity.y = delta.x * s;
                    self.velocity.x = delta.y * s;
                    if shift {
                        self.velocity.z = delta.x * s;
                    }
                }
            }
            (RotationMode::Object, None) => {}
            (RotationMode::Camera, _) if shift => camera.pan(delta),
            (RotationMode::Camera, _) => camera.orbit(delta),
        }
    }

    /// Reset object rotation and velocity and point the camera at the pivot
    pub fn recenter(&mut self, pivot: Option<&mut ObjectPivot>, camera: &mut OrbitCamera) {
        self.velocity = Vec3::ZERO;
        if let Some(pivot) = pivot {
            pivot.reset_rotation();
            camera.target = pivot.center;
        }
        debug!("Recentred view on {:?}", camera.target);
    }

    /// Per-frame update: inertia, idle spin and camera follow
    pub fn tick(&mut self, pivot: Option<&mut ObjectPivot>, camera: &mut OrbitCamera) {
        let Some(pivot) = pivot else {
            return;
        };

        match self.mode {
            RotationMode::Object => {
                if self.auto_rotate && !self.is_dragging() {
                    self.step_inertia(pivot);
                }
            }
            RotationMode::Camera => {
                if camera.target.distance(pivot.center) > self.tuning.follow_threshold {
                    camera.target = pivot.center;
                }
                if !self.is_dragging() && !self.auto_rotate {
                    pivot.rotation.y += self.tuning.idle_spin;
                }
            }
        }
    }

    fn step_inertia(&mut self, pivot: &mut ObjectPivot) {
        if self.velocity == Vec3::ZERO {
            return;
        }
        pivot.rotation += self.velocity;
        self.velocity *= self.tuning.friction;
        if self.velocity.abs().max_element() < self.tuning.inertia_epsilon {
            self.velocity = Vec3::ZERO;
        }
    }
}
