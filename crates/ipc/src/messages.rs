//! Messages exchanged between the gallery engine and the UI layer.

use serde::{Deserialize, Serialize};

use crate::input::MouseEvent;

/// Messages from the gallery engine to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GalleryToUi {
    /// Configurations the UI can offer, in catalog order
    ConfigurationList(Vec<ConfigurationInfo>),

    /// Any user-visible state changed
    StateChanged(GalleryState),

    /// A painting or exhibit could not be loaded
    AssetLoadFailed {
        /// Painting index, or none for the exhibit object
        painting: Option<usize>,
        reason: String,
    },

    /// Non-fatal problem worth surfacing
    Warning { message: String },
}

/// Messages from the UI to the gallery engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToGallery {
    /// UI finished loading and wants the initial state
    Ready,

    SelectConfiguration { name: String },

    /// Master intensity, 0-2
    SetUserIntensity { value: f32 },

    SetSpotOnlyMode { enabled: bool },

    /// Toggle the painterly shader
    SetEffectsEnabled { enabled: bool },

    SetRotationMode { mode: RotationMode },

    SetAutoRotate { enabled: bool },

    SetShowHelpers { visible: bool },

    ApplyPreset { preset: Preset },

    /// Slider edits to the shading parameters
    SetPainterlyParams(PainterlySettings),

    /// Reset object rotation and re-aim the camera
    Recenter,

    /// Glide the camera to a painting
    FocusPainting { index: usize },

    /// Pointer input captured by an overlay instead of the canvas
    Mouse(MouseEvent),
}

// ============================================================================
// State Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    pub active_configuration: Option<String>,
    pub spot_only_mode: bool,
    pub user_intensity: f32,
    pub effects_enabled: bool,
    pub material: MaterialKind,
    pub rotation_mode: RotationMode,
    pub auto_rotate: bool,
    pub show_helpers: bool,
    pub preset: Option<Preset>,
    pub params: PainterlySettings,
    pub light_count: usize,
    pub painting_count: usize,
}

/// Entry for the configuration picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationInfo {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationMode {
    #[default]
    Camera,
    Object,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialKind {
    #[default]
    Painterly,
    Standard,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    DaVinci,
    Caravaggio,
    Rembrandt,
}

/// Painterly shading sliders, colors as linear RGB
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainterlySettings {
    pub shadow_contrast: f32,
    pub light_intensity: f32,
    pub shadow_hardness: f32,
    pub scatter_amount: f32,
    pub edge_softness: f32,
    pub sss_intensity: f32,
    pub base_color: [f32; 3],
    pub light_color: [f32; 3],
}
