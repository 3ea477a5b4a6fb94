//! Mirror live gallery lights as bevy lights.
//!
//! Gallery intensities are unitless (about 0-3). They are scaled into bevy's
//! photometric units here. Bevy has no rectangular area light, so area
//! lights become point lights with a radius matching the panel.

use std::collections::HashMap;

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use lighting::{LightId, LightShape, LiveLight, SceneArtifact};

use crate::convert::{aimed, color, vec3};
use crate::engine::FrameRecorder;
use crate::material::PlaceholderObject;
use crate::paintings::PlaceholderPainting;

/// Lumens per unit of point light intensity
pub const POINT_LUMENS: f32 = 400_000.0;

/// Lumens per unit of spot light intensity
pub const SPOT_LUMENS: f32 = 600_000.0;

/// Lux per unit of directional light intensity
pub const DIRECTIONAL_LUX: f32 = 4_000.0;

/// Ambient brightness per unit of ambient intensity
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

/// Range of the point light standing in for an area light
const AREA_RANGE: f32 = 20.0;

/// Links a bevy light entity to its gallery light
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLight(pub LightId);

/// Bevy form of one live light
#[derive(Debug, Clone)]
pub enum BevyLight {
    Ambient { color: Color, brightness: f32 },
    Point(PointLight, Transform),
    Spot(SpotLight, Transform),
    Directional(DirectionalLight, Transform),
}

pub fn bevy_light(light: &LiveLight) -> BevyLight {
    let tint = color(light.color);
    let shadows_enabled = light.spec.casts_shadow;

    match light.shape {
        LightShape::Ambient => BevyLight::Ambient {
            color: tint,
            brightness: light.intensity * AMBIENT_BRIGHTNESS,
        },
        LightShape::Point { position, range } => BevyLight::Point(
            PointLight {
                color: tint,
                intensity: light.intensity * POINT_LUMENS,
                range,
                shadows_enabled,
                ..default()
            },
            Transform::from_translation(vec3(position)),
        ),
        LightShape::Spot { position, target, beam } => {
            let outer_angle = beam.beam_angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
            let inner_angle = outer_angle * (1.0 - beam.penumbra.clamp(0.0, 1.0));
            BevyLight::Spot(
                SpotLight {
                    color: tint,
                    intensity: light.intensity * SPOT_LUMENS,
                    range: beam.falloff_distance,
                    shadows_enabled,
                    inner_angle,
                    outer_angle,
                    ..default()
                },
                aimed(vec3(position), vec3(target)),
            )
        }
        LightShape::Directional { position, target } => BevyLight::Directional(
            DirectionalLight {
                color: tint,
                illuminance: light.intensity * DIRECTIONAL_LUX,
                shadows_enabled,
                ..default()
            },
            aimed(vec3(position), vec3(target)),
        ),
        LightShape::Area {
            position,
            target,
            width,
            height,
        } => BevyLight::Point(
            PointLight {
                color: tint,
                intensity: light.intensity * POINT_LUMENS,
                range: AREA_RANGE,
                radius: 0.5 * width.min(height),
                shadows_enabled,
                ..default()
            },
            aimed(vec3(position), vec3(target)),
        ),
    }
}

/// Combined ambient term of every ambient light
pub fn ambient_total(lights: &[LiveLight]) -> (Color, f32) {
    let mut weighted = glam::Vec3::ZERO;
    let mut total = 0.0;
    for light in lights.iter().filter(|l| matches!(l.shape, LightShape::Ambient)) {
        weighted += light.color * light.intensity;
        total += light.intensity;
    }
    if total <= 0.0 {
        return (Color::BLACK, 0.0);
    }
    (color(weighted / total), total * AMBIENT_BRIGHTNESS)
}

/// Despawn whatever the gallery released this frame
pub fn release_artifacts(
    mut commands: Commands,
    mut recorder: ResMut<FrameRecorder>,
    lights: Query<(Entity, &GalleryLight)>,
    placeholders: Query<(Entity, &PlaceholderPainting)>,
    placeholder_objects: Query<Entity, With<PlaceholderObject>>,
) {
    for artifact in recorder.take_released() {
        match artifact {
            SceneArtifact::Light(id) => {
                for (entity, _) in lights.iter().filter(|(_, l)| l.0 == id) {
                    commands.entity(entity).despawn();
                }
            }
            // Helpers are immediate-mode gizmos
            SceneArtifact::Helper(_) => {}
            SceneArtifact::Placeholder(index) => {
                for (entity, _) in placeholders.iter().filter(|(_, p)| p.0 == index) {
                    commands.entity(entity).despawn();
                }
            }
            SceneArtifact::PlaceholderObject => {
                for entity in &placeholder_objects {
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

/// Spawn or update one bevy light per live light
pub fn sync_lights(
    mut commands: Commands,
    recorder: Res<FrameRecorder>,
    mut ambient: ResMut<GlobalAmbientLight>,
    existing: Query<(Entity, &GalleryLight)>,
) {
    let Some(frame) = &recorder.frame else {
        return;
    };

    let entities: HashMap<LightId, Entity> = existing.iter().map(|(e, l)| (l.0, e)).collect();

    for light in &frame.lights {
        let tag = GalleryLight(light.id);
        let entity_for = entities.get(&light.id).copied();
        match bevy_light(light) {
            BevyLight::Ambient { .. } => {}
            BevyLight::Point(point, transform) => match entity_for {
                Some(entity) => {
                    commands.entity(entity).insert((point, transform));
                }
                None => {
                    commands.spawn((point, transform, tag));
                }
            },
            BevyLight::Spot(spot, transform) => match entity_for {
                Some(entity) => {
                    commands.entity(entity).insert((spot, transform));
                }
                None => {
                    commands.spawn((spot, transform, tag));
                }
            },
            BevyLight::Directional(directional, transform) => match entity_for {
                Some(entity) => {
                    commands.entity(entity).insert((directional, transform));
                }
                None => {
                    commands.spawn((directional, transform, tag));
                }
            },
        }
    }

    let (ambient_color, brightness) = ambient_total(&frame.lights);
    ambient.color = ambient_color;
    ambient.brightness = brightness;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighting::{LightingRig, LightingRigState, TargetSurface, WallSide};
    use sfumato_config::GalleryConfig;

    fn live(config: &str) -> Vec<LiveLight> {
        let rig = LightingRig::from_config(&GalleryConfig::default());
        let mut state = LightingRigState::default();
        let target = TargetSurface::on_wall(glam::Vec3::new(0.0, 1.5, -24.95), WallSide::Back, 2.0, 1.5);
        assert!(rig.apply_configuration(&mut state, config, &[target]).is_ok());
        state.live_lights
    }

    #[test]
    fn test_spot_cone_and_aim() {
        let lights = live("gallery-spots");
        let spots: Vec<_> = lights
            .iter()
            .filter_map(|l| match bevy_light(l) {
                BevyLight::Spot(spot, transform) => Some((spot, transform)),
                _ => None,
            })
            .collect();
        assert_eq!(spots.len(), 2);

        for (spot, transform) in spots {
            assert!(spot.inner_angle < spot.outer_angle);
            assert!(spot.shadows_enabled);
            // Each spot looks down towards the painting
            assert!(transform.forward().y < 0.0);
            assert!(transform.forward().z < 0.0);
        }
    }

    #[test]
    fn test_area_becomes_point_with_radius() {
        let lights = live("atelier");
        let area = lights
            .iter()
            .find_map(|l| match bevy_light(l) {
                BevyLight::Point(point, _) if point.radius > 0.0 => Some(point),
                _ => None,
            });
        assert!(area.is_some_and(|p| (p.radius - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_ambient_total() {
        let lights = live("gallery-spots");
        let (_, brightness) = ambient_total(&lights);
        assert!((brightness - 0.8 * AMBIENT_BRIGHTNESS).abs() < 1e-3);
        assert_eq!(ambient_total(&[]).1, 0.0);
    }

    #[test]
    fn test_intensity_scales_linearly() {
        let lights = live("studio");
        let directional = lights.iter().find_map(|l| match bevy_light(l) {
            BevyLight::Directional(d, _) => Some((d.illuminance, l.intensity)),
            _ => None,
        });
        assert!(directional.is_some_and(|(lux, i)| (lux - i * DIRECTIONAL_LUX).abs() < 1e-2));
    }
}
