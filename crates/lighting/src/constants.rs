use glam::Vec3;

/// Sweep animation cycle length in seconds.
pub const SWEEP_CYCLE_SECONDS: f32 = 4.0;

/// Sweep envelope breakpoints as fractions of the cycle (0.5 s / 1.5 s / 2.0 s of 4 s).
pub const SWEEP_RAMP_UP_END: f32 = 0.125;
pub const SWEEP_HOLD_END: f32 = 0.375;
pub const SWEEP_RAMP_DOWN_END: f32 = 0.5;

/// Lowest intensity multiplier the orbit style may produce.
pub const ORBIT_INTENSITY_FLOOR: f32 = 0.15;

/// Orbit angular speed range, radians per second.
pub const ORBIT_MIN_SPEED: f32 = 0.25;
pub const ORBIT_MAX_SPEED: f32 = 0.65;

/// Orbit offset amplitude range, world units.
pub const ORBIT_MIN_AMPLITUDE: f32 = 3.0;
pub const ORBIT_MAX_AMPLITUDE: f32 = 3.5;

/// Fog color used by the atmospheric scattering term (slightly cool).
pub const FOG_COLOR: Vec3 = Vec3::new(0.12, 0.13, 0.15);

/// Warm 4000K-ish white used by gallery spots (0xfff4e5).
pub const GALLERY_WHITE: u32 = 0xfff4e5;

/// Stone/marble tone of the painterly material (0xd4c4b0).
pub const STONE_COLOR: u32 = 0xd4c4b0;

/// Lighter stone tone of the standard material (0xe8dcc0).
pub const LIGHT_STONE_COLOR: u32 = 0xe8dcc0;

/// Neutral gray of placeholder geometry (0x888888).
pub const PLACEHOLDER_COLOR: u32 = 0x888888;

/// Size of the placeholder painting, meters.
pub const PLACEHOLDER_SIZE: f32 = 2.0;

/// Maximum painting frame when fitting from image aspect, meters.
pub const MAX_PAINTING_WIDTH: f32 = 2.5;
pub const MAX_PAINTING_HEIGHT: f32 = 2.0;

/// Duration of the camera move to a painting, seconds.
pub const FOCUS_TRANSITION_SECONDS: f32 = 1.0;

/// Viewing distance kept in front of a focused painting, meters.
pub const FOCUS_VIEW_DISTANCE: f32 = 4.0;
