//! The lighting rig: instantiates configurations into live lights and keeps
//! their intensities consistent under mode toggles and animation.
//!
//! The rig itself holds only immutable inputs (catalog, planner, tuning).
//! Everything that changes lives in [`LightingRigState`], passed by `&mut`.
//!
//! Each live light keeps a static `level` (what it would emit without
//! animation) and a rendered `intensity`. Spot-only mode saves every level
//! before changing it and restores the saved values exactly, so toggling it
//! any number of times never drifts.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sfumato_config::{GalleryConfig, LightingTuning};
use tracing::{debug, info, warn};

use crate::animation::{AnimationFrame, AnimationScheduler, phase_seed};
use crate::catalog::{LightingConfiguration, LightingConfigurationCatalog};
use crate::color::apply_hsl_offset;
use crate::error::GalleryError;
use crate::spot_placement::SpotPlacementPlanner;
use crate::types::{LightKind, LightRole, LightShape, LightSpec, TargetSurface};

/// Stable handle of a live light within one rig state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(pub u32);

/// A light currently in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveLight {
    pub id: LightId,
    /// Light as planned, never mutated after creation
    pub spec: LightSpec,
    /// Intensity without animation
    pub level: f32,
    /// Level saved when spot-only mode was enabled
    pub saved_level: Option<f32>,
    /// Rendered values, refreshed every tick
    pub intensity: f32,
    pub color: Vec3,
    pub shape: LightShape,
    pub phase_seed: f32,
}

impl LiveLight {
    pub fn kind(&self) -> LightKind {
        self.spec.kind()
    }

    pub fn is_animated_kind(&self) -> bool {
        self.kind() == LightKind::Spot
    }

    fn show_static(&mut self) {
        self.intensity = self.level;
        self.color = self.spec.color;
        self.shape = self.spec.shape;
    }
}

/// Mutable state of the rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingRigState {
    pub active_config_name: Option<String>,
    pub live_lights: Vec<LiveLight>,
    pub spot_only_mode: bool,
    /// Seconds of animation elapsed, >= 0
    pub animation_clock: f32,
    /// User intensity slider value
    pub user_intensity: f32,
    next_id: u32,
}

impl Default for LightingRigState {
    fn default() -> Self {
        Self {
            active_config_name: None,
            live_lights: Vec::new(),
            spot_only_mode: false,
            animation_clock: 0.0,
            user_intensity: 1.0,
            next_id: 0,
        }
    }
}

impl LightingRigState {
    pub fn light(&self, id: LightId) -> Option<&LiveLight> {
        self.live_lights.iter().find(|l| l.id == id)
    }

    pub fn lights_of_kind(&self, kind: LightKind) -> impl Iterator<Item = &LiveLight> {
        self.live_lights.iter().filter(move |l| l.kind() == kind)
    }

    /// Brightest key light, used to drive the painterly material
    pub fn key_light(&self) -> Option<&LiveLight> {
        self.live_lights
            .iter()
            .filter(|l| l.spec.role == LightRole::Key)
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }
}

/// Instantiates catalog configurations and drives mode changes
#[derive(Debug, Clone)]
pub struct LightingRig {
    catalog: LightingConfigurationCatalog,
    planner: SpotPlacementPlanner,
    tuning: LightingTuning,
}

impl LightingRig {
    pub fn new(catalog: LightingConfigurationCatalog, planner: SpotPlacementPlanner, tuning: LightingTuning) -> Self {
        Self {
            catalog,
            planner,
            tuning,
        }
    }

    /// Rig with the built-in catalog for the configured room
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            LightingConfigurationCatalog::builtin(&config.room, &config.lighting),
            SpotPlacementPlanner::new(config.room.ceiling_height, &config.lighting),
            config.lighting.clone(),
        )
    }

    pub fn catalog(&self) -> &LightingConfigurationCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut LightingConfigurationCatalog {
        &mut self.catalog
    }

    pub fn planner(&self) -> &SpotPlacementPlanner {
        &self.planner
    }

    pub fn active_configuration<'a>(&'a self, state: &LightingRigState) -> Option<&'a LightingConfiguration> {
        state.active_config_name.as_deref().and_then(|name| self.catalog.get(name))
    }

    /// Replace all live lights with the named configuration. Unknown names
    /// leave the state untouched.
    pub fn apply_configuration(
        &self,
        state: &mut LightingRigState,
        name: &str,
        targets: &[TargetSurface],
    ) -> Result<(), GalleryError> {
        let Some(config) = self.catalog.get(name) else {
            warn!("Unknown lighting configuration '{}', keeping current lights", name);
            return Err(GalleryError::UnknownConfiguration(name.to_string()));
        };

        let specs = self.instantiate(config, targets);

        state.live_lights.clear();
        for spec in specs {
            let id = LightId(state.next_id);
            state.next_id = state.next_id.wrapping_add(1);
            let index = state.live_lights.len();
            let level = self.static_level(&spec, state.user_intensity, false);
            state.live_lights.push(LiveLight {
                id,
                spec,
                level,
                saved_level: None,
                intensity: level,
                color: spec.color,
                shape: spec.shape,
                phase_seed: phase_seed(index),
            });
        }

        state.active_config_name = Some(config.name.clone());
        if !config.is_animated() {
            state.animation_clock = 0.0;
        }

        if state.spot_only_mode {
            self.enter_spot_only(state);
        }
        self.refresh(state);

        info!(
            "Applied lighting configuration '{}' with {} lights over {} targets",
            config.name,
            state.live_lights.len(),
            targets.len()
        );
        Ok(())
    }

    fn instantiate(&self, config: &LightingConfiguration, targets: &[TargetSurface]) -> Vec<LightSpec> {
        let mut specs = Vec::new();
        if let Some(ambient) = config.ambient {
            specs.push(LightSpec::ambient(ambient.color, ambient.intensity));
        }
        specs.extend(config.fills.iter().copied());
        specs.extend(config.directional);
        specs.extend(config.area);

        if let Some(template) = &config.spots {
            if targets.is_empty() {
                warn!("{}, configuration '{}'", GalleryError::NoTargetSurfaces, config.name);
            } else {
                specs.extend(self.planner.plan_all(targets, template, self.tuning.max_shadow_spots));
            }
        }
        specs
    }

    fn kind_scale(&self, spec: &LightSpec) -> f32 {
        match spec.kind() {
            LightKind::Spot => self.tuning.spot_scale,
            LightKind::Ambient | LightKind::Point | LightKind::Directional | LightKind::Area => 1.0,
        }
    }

    /// Level of a light outside spot-only mode, or boosted when `boosted`
    fn static_level(&self, spec: &LightSpec, user_intensity: f32, boosted: bool) -> f32 {
        let base = spec.base_intensity * self.kind_scale(spec);
        match spec.role {
            LightRole::Ambient | LightRole::Fill => base,
            LightRole::Key if boosted => base * user_intensity * self.tuning.spot_only_boost,
            LightRole::Key => base * user_intensity,
        }
    }

    fn enter_spot_only(&self, state: &mut LightingRigState) {
        for light in &mut state.live_lights {
            light.saved_level = Some(light.level);
            light.level = if light.spec.is_suppressible() {
                0.0
            } else {
                light.level * self.tuning.spot_only_boost
            };
        }
    }

    /// Turn ambient and fill lights off and boost key lights, or restore the
    /// saved levels. Setting the current mode again does nothing.
    pub fn set_spot_only_mode(&self, state: &mut LightingRigState, enabled: bool) {
        if state.spot_only_mode == enabled {
            debug!("Spot-only mode already {}", enabled);
            return;
        }
        state.spot_only_mode = enabled;

        if enabled {
            self.enter_spot_only(state);
        } else {
            for light in &mut state.live_lights {
                if let Some(saved) = light.saved_level.take() {
                    light.level = saved;
                }
            }
        }
        self.refresh(state);
        info!("Spot-only mode {}", if enabled { "on" } else { "off" });
    }

    /// Set the slider value driving key lights
    pub fn set_user_intensity(&self, state: &mut LightingRigState, value: f32) {
        let value = if value.is_finite() { value.max(0.0) } else { 1.0 };
        state.user_intensity = value;

        let spot_only = state.spot_only_mode;
        for light in &mut state.live_lights {
            if light.spec.role != LightRole::Key {
                continue;
            }
            let unboosted = self.static_level(&light.spec, value, false);
            if spot_only {
                light.saved_level = Some(unboosted);
                light.level = self.static_level(&light.spec, value, true);
            } else {
                light.level = unboosted;
            }
        }
        self.refresh(state);
    }

    /// Advance animation by `dt` seconds. Returns the frame applied, if the
    /// active configuration is animated.
    pub fn tick(&self, state: &mut LightingRigState, dt: f32) -> Option<AnimationFrame> {
        let style = self.active_configuration(state).and_then(|c| c.animation);
        let Some(style) = style else {
            self.refresh(state);
            return None;
        };

        let seeds: Vec<f32> = state
            .live_lights
            .iter()
            .filter(|l| l.is_animated_kind())
            .map(|l| l.phase_seed)
            .collect();
        let (clock, frame) = AnimationScheduler::new(style).tick(state.animation_clock, dt, &seeds);
        state.animation_clock = clock;

        let mut offsets = frame.lights.iter();
        for light in &mut state.live_lights {
            if !light.is_animated_kind() {
                light.show_static();
                continue;
            }
            match offsets.next() {
                Some(offset) => {
                    light.intensity = light.level * offset.intensity_multiplier;
                    light.color = apply_hsl_offset(light.spec.color, offset.color_offset);
                    light.shape = light.spec.shape.displaced(offset.position_offset, offset.target_offset());
                }
                None => light.show_static(),
            }
        }
        Some(frame)
    }

    /// Re-derive rendered values from static levels (animation frozen)
    fn refresh(&self, state: &mut LightingRigState) {
        let animated = self.active_configuration(state).is_some_and(|c| c.is_animated());
        if animated {
            // Keep the current animation pose but pick up new levels
            let _ = self.tick(state, 0.0);
            return;
        }
        for light in &mut state.live_lights {
            light.show_static();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WallSide;
    use sfumato_config::RoomConfig;

    fn rig() -> LightingRig {
        LightingRig::from_config(&GalleryConfig::default())
    }

    fn paintings(count: usize) -> Vec<TargetSurface> {
        (0..count)
            .map(|i| TargetSurface::on_wall(Vec3::new(i as f32 * 4.0 - 10.0, 1.5, -24.95), WallSide::Back, 2.0, 1.5))
            .collect()
    }

    fn levels(state: &LightingRigState) -> Vec<f32> {
        state.live_lights.iter().map(|l| l.level).collect()
    }

    #[test]
    fn test_gallery_spots_instantiation() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(3)).is_ok());

        assert_eq!(state.active_config_name.as_deref(), Some("gallery-spots"));
        assert_eq!(state.lights_of_kind(LightKind::Ambient).count(), 1);
        assert_eq!(state.lights_of_kind(LightKind::Point).count(), 4);
        assert_eq!(state.lights_of_kind(LightKind::Spot).count(), 6);

        let spot = state.lights_of_kind(LightKind::Spot).next().map(|l| l.level);
        assert_eq!(spot, Some(1.2));
    }

    #[test]
    fn test_gallery_spots_under_low_ceiling() {
        let config = GalleryConfig {
            room: RoomConfig {
                ceiling_height: 3.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let rig = LightingRig::from_config(&config);
        let mut state = LightingRigState::default();
        let target = TargetSurface::on_wall(Vec3::new(0.0, 1.5, -5.0), WallSide::Back, 2.5, 2.0);
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &[target]).is_ok());

        let spots: Vec<(Vec3, Vec3)> = state
            .lights_of_kind(LightKind::Spot)
            .filter_map(|l| match l.shape {
                LightShape::Spot { position, target, .. } => Some((position, target)),
                _ => None,
            })
            .collect();
        assert_eq!(spots.len(), 2);
        for (position, aim) in &spots {
            assert!(position.y <= 2.9 + 1e-6, "spot above ceiling clearance: {position:?}");
            assert_eq!(*aim, target.position);
        }
        assert!((spots[0].0.x + spots[1].0.x).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_configuration_leaves_rig_unchanged() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(2)).is_ok());
        let before = state.clone();

        let result = rig.apply_configuration(&mut state, "disco", &paintings(2));
        assert_eq!(result, Err(GalleryError::UnknownConfiguration("disco".into())));
        assert_eq!(state, before);
    }

    #[test]
    fn test_spot_only_toggle_is_idempotent() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(4)).is_ok());
        rig.set_user_intensity(&mut state, 0.7);
        let original = levels(&state);

        rig.set_spot_only_mode(&mut state, true);
        rig.set_spot_only_mode(&mut state, true);
        for light in &state.live_lights {
            match light.spec.role {
                LightRole::Ambient | LightRole::Fill => assert_eq!(light.level, 0.0),
                LightRole::Key => assert!(light.level > 0.0),
            }
        }

        for _ in 0..5 {
            rig.set_spot_only_mode(&mut state, false);
            rig.set_spot_only_mode(&mut state, true);
        }
        rig.set_spot_only_mode(&mut state, false);

        for (a, b) in original.iter().zip(levels(&state)) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_user_intensity_formula() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(1)).is_ok());

        rig.set_user_intensity(&mut state, 1.5);
        let spot = |s: &LightingRigState| s.lights_of_kind(LightKind::Spot).map(|l| l.level).next();
        assert!((spot(&state).unwrap_or(0.0) - 1.5 * 1.2).abs() < 1e-6);

        rig.set_spot_only_mode(&mut state, true);
        assert!((spot(&state).unwrap_or(0.0) - 1.5 * 1.2 * 2.0).abs() < 1e-6);

        // Changing the slider in spot-only mode updates the value restored later
        rig.set_user_intensity(&mut state, 0.5);
        assert!((spot(&state).unwrap_or(0.0) - 0.5 * 1.2 * 2.0).abs() < 1e-6);
        rig.set_spot_only_mode(&mut state, false);
        assert!((spot(&state).unwrap_or(0.0) - 0.5 * 1.2).abs() < 1e-6);

        // Ambient ignores the slider
        let ambient = state.lights_of_kind(LightKind::Ambient).next().map(|l| l.level);
        assert_eq!(ambient, Some(0.8));
    }

    #[test]
    fn test_spot_only_survives_configuration_switch() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(2)).is_ok());
        rig.set_spot_only_mode(&mut state, true);
        assert!(rig.apply_configuration(&mut state, "caterpillar", &paintings(2)).is_ok());

        assert!(state.spot_only_mode);
        assert!(state.lights_of_kind(LightKind::Ambient).all(|l| l.level == 0.0));
        rig.set_spot_only_mode(&mut state, false);
        assert!(state.lights_of_kind(LightKind::Ambient).all(|l| (l.level - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_no_targets_skips_spots() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &[]).is_ok());
        assert_eq!(state.lights_of_kind(LightKind::Spot).count(), 0);
        assert_eq!(state.live_lights.len(), 5);
    }

    #[test]
    fn test_static_configuration_does_not_animate() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(2)).is_ok());
        let before = state.clone();
        assert!(rig.tick(&mut state, 0.5).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_sweep_animation_drives_spots() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "caterpillar", &paintings(2)).is_ok());

        let frame = rig.tick(&mut state, 1.0);
        assert_eq!(frame.map(|f| f.lights.len()), Some(4));
        assert!((state.animation_clock - 1.0).abs() < 1e-6);

        let first_spot = state.lights_of_kind(LightKind::Spot).next().copied();
        let spot = first_spot.map(|l| (l.intensity, l.level));
        assert_eq!(spot, Some((1.2, 1.2)));

        // Fills stay static
        assert!(state.lights_of_kind(LightKind::Point).all(|l| l.intensity == l.level));
    }

    #[test]
    fn test_orbit_moves_spots_and_targets() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "show", &paintings(1)).is_ok());
        let _ = rig.tick(&mut state, 2.0);

        for light in state.lights_of_kind(LightKind::Spot) {
            assert_ne!(light.shape, light.spec.shape);
            assert!(light.intensity >= light.level * 0.15 - 1e-6);
        }
    }

    #[test]
    fn test_clock_resets_on_static_configuration() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "show", &paintings(1)).is_ok());
        let _ = rig.tick(&mut state, 3.0);
        assert!(rig.apply_configuration(&mut state, "gallery-spots", &paintings(1)).is_ok());
        assert_eq!(state.animation_clock, 0.0);
    }

    #[test]
    fn test_studio_uses_directional_key() {
        let rig = rig();
        let mut state = LightingRigState::default();
        assert!(rig.apply_configuration(&mut state, "studio", &[]).is_ok());
        let key = state.key_light().map(|l| l.kind());
        assert_eq!(key, Some(LightKind::Directional));
        assert_eq!(state.lights_of_kind(LightKind::Spot).count(), 0);
    }
}
