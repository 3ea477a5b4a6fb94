//! Debug visualisations derived from live lights.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::rig::{LightId, LiveLight};
use crate::types::LightShape;

/// Size of the orb drawn for point lights
const ORB_RADIUS: f32 = 0.15;

/// Length of the arrow drawn for directional lights
const ARROW_LENGTH: f32 = 1.0;

/// Shape to draw for a light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HelperShape {
    Cone {
        apex: Vec3,
        direction: Vec3,
        length: f32,
        radius: f32,
    },
    Orb {
        center: Vec3,
        radius: f32,
    },
    Panel {
        center: Vec3,
        normal: Vec3,
        width: f32,
        height: f32,
    },
    Arrow {
        origin: Vec3,
        direction: Vec3,
        length: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightHelper {
    pub light: LightId,
    pub shape: HelperShape,
    pub color: Vec3,
    /// Opacity tracking the light's current intensity, 0-1
    pub opacity: f32,
}

/// Helper for a live light; ambient lights have none
pub fn helper_for(light: &LiveLight) -> Option<LightHelper> {
    let shape = match light.shape {
        LightShape::Ambient => return None,
        LightShape::Point { position, .. } => HelperShape::Orb {
            center: position,
            radius: ORB_RADIUS,
        },
        LightShape::Spot {
            position,
            target,
            beam,
        } => {
            let length = position.distance(target);
            HelperShape::Cone {
                apex: position,
                direction: (target - position).normalize_or_zero(),
                length,
                radius: length * beam.beam_angle.tan(),
            }
        }
        LightShape::Directional { position, target } => HelperShape::Arrow {
            origin: position,
            direction: (target - position).normalize_or_zero(),
            length: ARROW_LENGTH,
        },
        LightShape::Area {
            position,
            target,
            width,
            height,
        } => HelperShape::Panel {
            center: position,
            normal: (target - position).normalize_or_zero(),
            width,
            height,
        },
    };

    let reference = light.level.max(f32::EPSILON);
    Some(LightHelper {
        light: light.id,
        shape,
        color: light.color,
        opacity: (light.intensity / reference).clamp(0.0, 1.0),
    })
}

pub fn helpers_for<'a>(lights: impl IntoIterator<Item = &'a LiveLight>) -> Vec<LightHelper> {
    lights.into_iter().filter_map(helper_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::{LightingRig, LightingRigState};
    use crate::types::{TargetSurface, WallSide};
    use sfumato_config::GalleryConfig;

    fn state(config: &str) -> LightingRigState {
        let rig = LightingRig::from_config(&GalleryConfig::default());
        let mut state = LightingRigState::default();
        let target = TargetSurface::on_wall(Vec3::new(0.0, 1.5, -24.95), WallSide::Back, 2.0, 1.5);
        assert!(rig.apply_configuration(&mut state, config, &[target]).is_ok());
        state
    }

    #[test]
    fn test_one_helper_per_positioned_light() {
        let state = state("gallery-spots");
        let helpers = helpers_for(&state.live_lights);
        // Everything except the ambient light
        assert_eq!(helpers.len(), state.live_lights.len() - 1);
        let cones = helpers.iter().filter(|h| matches!(h.shape, HelperShape::Cone { .. })).count();
        let orbs = helpers.iter().filter(|h| matches!(h.shape, HelperShape::Orb { .. })).count();
        assert_eq!((cones, orbs), (2, 4));
    }

    #[test]
    fn test_cone_points_at_target() {
        let state = state("gallery-spots");
        for helper in helpers_for(&state.live_lights) {
            if let HelperShape::Cone { apex, direction, length, .. } = helper.shape {
                let tip = apex + direction * length;
                assert!((tip - Vec3::new(0.0, 1.5, -24.95)).length() < 1e-3);
                assert_eq!(helper.opacity, 1.0);
            }
        }
    }

    #[test]
    fn test_studio_and_atelier_shapes() {
        let studio = helpers_for(&state("studio").live_lights);
        assert!(studio.iter().any(|h| matches!(h.shape, HelperShape::Arrow { .. })));
        let atelier = helpers_for(&state("atelier").live_lights);
        assert!(atelier.iter().any(|h| matches!(h.shape, HelperShape::Panel { .. })));
    }
}
