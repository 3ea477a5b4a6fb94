//! Shared configuration for Sfumato
//!
//! This crate provides the single source of truth for window dimensions,
//! gallery room geometry, and the tuning constants used by the lighting rig
//! and the interaction controller. Every section has a `Default` backed by
//! the `DEFAULT_*` constants below, and a JSON file may override any subset
//! of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Room footprint along X, in meters
pub const DEFAULT_ROOM_WIDTH: f32 = 60.0;

/// Room footprint along Z, in meters
pub const DEFAULT_ROOM_DEPTH: f32 = 50.0;

/// Height of the ceiling track the spots hang from
pub const DEFAULT_CEILING_HEIGHT: f32 = 6.0;

/// Height of painting centers and of a normalized bust
pub const DEFAULT_HANG_HEIGHT: f32 = 1.5;

/// Angle between a spot's beam and the vertical, in degrees
pub const DEFAULT_INCIDENCE_ANGLE_DEG: f32 = 30.0;

/// Spots never sit closer than this to the ceiling plane
pub const DEFAULT_CEILING_CLEARANCE: f32 = 0.1;

/// Shadow-casting spots allowed per scene
pub const DEFAULT_MAX_SHADOW_SPOTS: usize = 12;

/// Multiplier applied to spot intensities in spot-only mode
pub const DEFAULT_SPOT_ONLY_BOOST: f32 = 2.0;

/// Kind-specific multiplier for planned spots
pub const DEFAULT_SPOT_SCALE: f32 = 1.2;

/// Kind-specific multiplier for fill lights (several share the room)
pub const DEFAULT_FILL_SCALE: f32 = 0.4;

/// Friction applied to inertial rotation every tick
pub const DEFAULT_FRICTION: f32 = 0.95;

/// Angular velocity below which inertial rotation stops
pub const DEFAULT_INERTIA_EPSILON: f32 = 1e-4;

/// Display configuration for window and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Geometry of the exhibition room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub width: f32,
    pub depth: f32,
    pub ceiling_height: f32,
    /// Height at which paintings are hung and busts are centered
    pub hang_height: f32,
    /// Distance kept free at each wall end
    pub wall_margin: f32,
    /// Paintings hang this far in front of the wall plane
    pub wall_inset: f32,
    /// Minimum center-to-center distance between paintings on one wall
    pub min_spacing: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROOM_WIDTH,
            depth: DEFAULT_ROOM_DEPTH,
            ceiling_height: DEFAULT_CEILING_HEIGHT,
            hang_height: DEFAULT_HANG_HEIGHT,
            wall_margin: 3.0,
            wall_inset: 0.05,
            min_spacing: 2.0,
        }
    }
}

/// Numeric tuning for spot placement and the lighting rig
///
/// The boost and scale factors are empirical. They are kept here so they
/// can be tuned without touching the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingTuning {
    pub incidence_angle_deg: f32,
    pub ceiling_clearance: f32,
    pub max_shadow_spots: usize,
    pub spot_only_boost: f32,
    pub spot_scale: f32,
    pub fill_scale: f32,
}

impl Default for LightingTuning {
    fn default() -> Self {
        Self {
            incidence_angle_deg: DEFAULT_INCIDENCE_ANGLE_DEG,
            ceiling_clearance: DEFAULT_CEILING_CLEARANCE,
            max_shadow_spots: DEFAULT_MAX_SHADOW_SPOTS,
            spot_only_boost: DEFAULT_SPOT_ONLY_BOOST,
            spot_scale: DEFAULT_SPOT_SCALE,
            fill_scale: DEFAULT_FILL_SCALE,
        }
    }
}

/// Sensitivities and limits for pointer-driven rotation and zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    /// Radians of object rotation per pixel of drag
    pub drag_speed: f32,
    /// Radians per tick of inertial velocity per pixel of the last drag delta
    pub inertia_scale: f32,
    pub friction: f32,
    pub inertia_epsilon: f32,
    /// Distance units per wheel delta unit in object-rotation mode
    pub wheel_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Slow spin applied to the object in camera mode, radians per tick
    pub idle_spin: f32,
    /// Camera target drift that triggers re-centering on the object
    pub follow_threshold: f32,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            drag_speed: 0.01,
            inertia_scale: 0.001,
            friction: DEFAULT_FRICTION,
            inertia_epsilon: DEFAULT_INERTIA_EPSILON,
            wheel_speed: 0.01,
            min_distance: 2.0,
            max_distance: 10.0,
            idle_spin: 0.001,
            follow_threshold: 0.1,
        }
    }
}

/// Errors raised while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete gallery configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct GalleryConfig {
    pub display: DisplayConfig,
    pub room: RoomConfig,
    pub lighting: LightingTuning,
    pub interaction: InteractionTuning,
}

impl GalleryConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
