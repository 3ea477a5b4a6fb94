//! Error types for the gallery core.
//!
//! None of these are fatal. The orchestrator logs each one and substitutes a
//! safe default (placeholder geometry, unit scale, flat material, or the
//! previous lighting state).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GalleryError {
    #[error("Unknown lighting configuration: {0}")]
    UnknownConfiguration(String),

    #[error("No target surfaces loaded, spots skipped")]
    NoTargetSurfaces,

    #[error("Degenerate geometry: bounding box size {size:?}")]
    DegenerateGeometry { size: [f32; 3] },

    #[error("Asset failed to load: {0}")]
    AssetLoad(String),

    #[error("Shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("Invalid lighting catalog: {0}")]
    InvalidCatalog(String),
}
