//! Sfumato lighting engine - painterly shading and museum lighting
//!
//! This crate is the engine-independent core of the gallery:
//! - [`reflectance`] - Chiaroscuro/sfumato shading equation and presets
//! - [`spot_placement`] - Ceiling spot positions for target surfaces
//! - [`catalog`] - Named lighting configurations
//! - [`rig`] - Live lights, spot-only mode and user intensity
//! - [`animation`] - Sweep and orbit light animation
//! - [`transform`] - Object normalization and rotation pivot
//! - [`interaction`] - Pointer handling, inertia and camera follow
//! - [`room`] - Painting layout around the room
//! - [`orchestrator`] - Frame loop tying everything together

pub mod animation;
pub mod camera;
pub mod catalog;
pub mod color;
pub mod constants;
pub mod error;
pub mod helpers;
pub mod interaction;
pub mod orchestrator;
pub mod reflectance;
pub mod rig;
pub mod room;
pub mod spot_placement;
pub mod transform;
pub mod types;

pub use animation::*;
pub use camera::*;
pub use catalog::*;
pub use color::*;
pub use constants::*;
pub use error::*;
pub use helpers::*;
pub use interaction::*;
pub use orchestrator::*;
pub use reflectance::*;
pub use rig::*;
pub use room::*;
pub use spot_placement::*;
pub use transform::*;
pub use types::*;
