//! Named lighting configurations.
//!
//! Each configuration is an immutable recipe: ambient, fill, spot template,
//! optional directional or area key, and an optional animation style. The
//! built-in table is derived from the room so fills hang at ceiling height;
//! extra entries can be loaded from JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sfumato_config::{LightingTuning, RoomConfig};
use tracing::{info, warn};

use crate::color::rgb_from_hex;
use crate::constants::GALLERY_WHITE;
use crate::error::GalleryError;
use crate::spot_placement::SpotTemplate;
use crate::types::{LightKind, LightSpec, SpotBeam};

/// Animation applied to a configuration's spots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    /// Envelope travelling across the spots in order
    Sweep,
    /// Spots wander on ellipses and figure-eights
    Orbit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientTemplate {
    pub color: Vec3,
    pub intensity: f32,
}

/// One entry of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfiguration {
    pub name: String,
    /// Human readable label for the UI
    pub label: String,
    #[serde(default)]
    pub ambient: Option<AmbientTemplate>,
    /// Fill and back lights, instantiated as-is
    #[serde(default)]
    pub fills: Vec<LightSpec>,
    /// Per-target spots; `None` disables spots
    #[serde(default)]
    pub spots: Option<SpotTemplate>,
    #[serde(default)]
    pub directional: Option<LightSpec>,
    #[serde(default)]
    pub area: Option<LightSpec>,
    #[serde(default)]
    pub animation: Option<AnimationStyle>,
}

impl LightingConfiguration {
    pub fn spots_enabled(&self) -> bool {
        self.spots.is_some()
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    fn validate(&self) -> Result<(), GalleryError> {
        if self.name.trim().is_empty() {
            return Err(GalleryError::InvalidCatalog("configuration without a name".into()));
        }
        let wrong_kind = |spec: &Option<LightSpec>, kind: LightKind| spec.as_ref().is_some_and(|s| s.kind() != kind);
        if wrong_kind(&self.directional, LightKind::Directional) {
            return Err(GalleryError::InvalidCatalog(format!(
                "{}: directional slot holds another light kind",
                self.name
            )));
        }
        if wrong_kind(&self.area, LightKind::Area) {
            return Err(GalleryError::InvalidCatalog(format!(
                "{}: area slot holds another light kind",
                self.name
            )));
        }
        Ok(())
    }
}

/// Four overhead fills covering the room quadrants, sharing `intensity`
fn quadrant_fills(room: &RoomConfig, tuning: &LightingTuning, intensity: f32) -> Vec<LightSpec> {
    let x = room.width / 4.0;
    let z = room.depth / 4.0;
    let share = intensity * tuning.fill_scale;
    [(-x, -z), (x, -z), (-x, z), (x, z)]
        .into_iter()
        .map(|(px, pz)| LightSpec::fill(Vec3::ONE, share, Vec3::new(px, room.ceiling_height, pz), 100.0))
        .collect()
}

fn gallery_spots(intensity: f32) -> SpotTemplate {
    SpotTemplate {
        color: rgb_from_hex(GALLERY_WHITE),
        intensity,
        count_per_target: 2,
        beam: SpotBeam {
            beam_angle: 40f32.to_radians(),
            penumbra: 0.3,
            falloff_distance: 20.0,
            decay: 1.5,
        },
        aim_spread: 0.0,
    }
}

/// Built-in configurations for a room
pub fn builtin_configurations(room: &RoomConfig, tuning: &LightingTuning) -> Vec<LightingConfiguration> {
    let hang = room.hang_height;
    vec![
        LightingConfiguration {
            name: "gallery-spots".into(),
            label: "Gallery spots".into(),
            ambient: Some(AmbientTemplate {
                color: Vec3::ONE,
                intensity: 0.8,
            }),
            fills: quadrant_fills(room, tuning, 0.4),
            spots: Some(gallery_spots(1.0)),
            directional: None,
            area: None,
            animation: None,
        },
        LightingConfiguration {
            name: "show".into(),
            label: "Light show".into(),
            ambient: Some(AmbientTemplate {
                color: Vec3::ONE,
                intensity: 0.3,
            }),
            fills: quadrant_fills(room, tuning, 0.8),
            spots: Some(gallery_spots(0.3)),
            directional: None,
            area: None,
            animation: Some(AnimationStyle::Orbit),
        },
        LightingConfiguration {
            name: "caterpillar".into(),
            label: "Caterpillar".into(),
            ambient: Some(AmbientTemplate {
                color: Vec3::ONE,
                intensity: 0.4,
            }),
            fills: quadrant_fills(room, tuning, 0.3),
            spots: Some(gallery_spots(1.0)),
            directional: None,
            area: None,
            animation: Some(AnimationStyle::Sweep),
        },
        LightingConfiguration {
            name: "studio".into(),
            label: "Studio".into(),
            ambient: Some(AmbientTemplate {
                color: Vec3::ONE,
                intensity: 0.3,
            }),
            fills: vec![
                LightSpec::fill(rgb_from_hex(0x4466aa), 0.15, Vec3::new(2.0, 1.0, 3.0), 50.0),
                LightSpec::fill(rgb_from_hex(0xffeedd), 0.2, Vec3::new(0.0, 2.0, -3.0), 50.0),
            ],
            spots: None,
            directional: Some(LightSpec::directional(
                rgb_from_hex(0xffffee),
                1.5,
                Vec3::new(-3.0, 4.0, 2.0),
                Vec3::new(0.0, hang, 0.0),
            )),
            area: None,
            animation: None,
        },
        LightingConfiguration {
            name: "atelier".into(),
            label: "Atelier skylight".into(),
            ambient: Some(AmbientTemplate {
                color: rgb_from_hex(0xdde4ff),
                intensity: 0.25,
            }),
            fills: Vec::new(),
            spots: None,
            directional: None,
            area: Some(LightSpec::area(
                rgb_from_hex(0xf4f1ea),
                1.2,
                Vec3::new(-2.0, room.ceiling_height.min(4.5), 1.0),
                Vec3::new(0.0, hang, 0.0),
                3.0,
                2.0,
            )),
            animation: None,
        },
    ]
}

/// Lookup table of configurations, in declaration order
#[derive(Debug, Clone, Default)]
pub struct LightingConfigurationCatalog {
    entries: Vec<LightingConfiguration>,
}

impl LightingConfigurationCatalog {
    pub fn new(entries: Vec<LightingConfiguration>) -> Self {
        Self { entries }
    }

    pub fn builtin(room: &RoomConfig, tuning: &LightingTuning) -> Self {
        Self::new(builtin_configurations(room, tuning))
    }

    pub fn get(&self, name: &str) -> Option<&LightingConfiguration> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    pub fn entries(&self) -> &[LightingConfiguration] {
        &self.entries
    }

    /// Add or replace a configuration by name
    pub fn insert(&mut self, config: LightingConfiguration) -> Result<(), GalleryError> {
        config.validate()?;
        if let Some(existing) = self.entries.iter_mut().find(|c| c.name == config.name) {
            warn!("Replacing lighting configuration '{}'", config.name);
            *existing = config;
        } else {
            self.entries.push(config);
        }
        Ok(())
    }

    /// Merge configurations from a JSON array. Nothing is inserted when any
    /// entry is invalid.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, GalleryError> {
        let configs: Vec<LightingConfiguration> =
            serde_json::from_str(json).map_err(|e| GalleryError::InvalidCatalog(e.to_string()))?;
        for config in &configs {
            config.validate()?;
        }
        let count = configs.len();
        for config in configs {
            self.insert(config)?;
        }
        info!("Loaded {} lighting configurations from JSON", count);
        Ok(count)
    }
}
