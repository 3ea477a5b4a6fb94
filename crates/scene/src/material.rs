//! Exhibit object materials: the painterly shader and its fallbacks.

use bevy::asset::{LoadState, embedded_asset};
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;
use lighting::{MaterialChoice, MaterialFrame, SurfaceMaterial};

use crate::convert::{color, transform};
use crate::engine::{FrameRecorder, Gallery};

const PAINTERLY_SHADER: &str = "embedded://sfumato_scene/shaders/painterly.wgsl";

/// Marker for the loaded exhibit object
#[derive(Component, Debug, Clone, Copy)]
pub struct ExhibitObject;

/// Gray cube standing in for an object that failed to load
#[derive(Component, Debug, Clone, Copy)]
pub struct PlaceholderObject;

/// Which material the object currently carries
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMaterial(pub MaterialChoice);

/// Uniform data for the painterly shader
#[derive(Clone, Copy, Debug, Default, PartialEq, ShaderType)]
pub struct PainterlyUniform {
    pub base_color: Vec4,
    pub light_color: Vec4,
    /// w = 1 when a key light exists
    pub light_position: Vec4,
    /// shadow contrast, light intensity, shadow hardness, scatter amount
    pub tone: Vec4,
    /// edge softness, sss intensity, animation time, unused
    pub soft: Vec4,
}

#[derive(Asset, AsBindGroup, TypePath, Clone, Default)]
pub struct PainterlyMaterial {
    #[uniform(0)]
    pub uniform: PainterlyUniform,
}

impl Material for PainterlyMaterial {
    fn fragment_shader() -> ShaderRef {
        PAINTERLY_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }
}

fn linear(rgb: glam::Vec3) -> Vec4 {
    Vec4::from_array(color(rgb).to_linear().to_f32_array())
}

pub fn painterly_uniform(frame: &MaterialFrame, time: f32) -> PainterlyUniform {
    let params = &frame.params;
    let light_position = match frame.light_position {
        Some(p) => Vec4::new(p.x, p.y, p.z, 1.0),
        None => Vec4::ZERO,
    };
    PainterlyUniform {
        base_color: linear(params.base_color),
        light_color: linear(params.light_color),
        light_position,
        tone: Vec4::new(
            params.shadow_contrast,
            params.light_intensity,
            params.shadow_hardness,
            params.scatter_amount,
        ),
        soft: Vec4::new(params.edge_softness, params.sss_intensity, time, 0.0),
    }
}

pub fn standard_material(surface: SurfaceMaterial) -> StandardMaterial {
    StandardMaterial {
        base_color: color(surface.base_color),
        perceptual_roughness: surface.roughness,
        metallic: surface.metalness,
        ..default()
    }
}

/// Material handles shared by every exhibit object
#[derive(Resource, Debug, Clone)]
pub struct ObjectMaterials {
    pub painterly: Handle<PainterlyMaterial>,
    pub standard: Handle<StandardMaterial>,
    pub flat: Handle<StandardMaterial>,
    shader: Handle<Shader>,
    shader_checked: bool,
}

pub struct PainterlyMaterialPlugin;

impl Plugin for PainterlyMaterialPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "shaders/painterly.wgsl");

        app.add_plugins(MaterialPlugin::<PainterlyMaterial>::default())
            .add_systems(Startup, setup_object_materials);
    }
}

fn setup_object_materials(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut painterly: ResMut<Assets<PainterlyMaterial>>,
    mut standard: ResMut<Assets<StandardMaterial>>,
) {
    let surface = |choice: MaterialChoice| choice.surface().map(standard_material).unwrap_or_default();
    commands.insert_resource(ObjectMaterials {
        painterly: painterly.add(PainterlyMaterial::default()),
        standard: standard.add(surface(MaterialChoice::Standard)),
        flat: standard.add(surface(MaterialChoice::Flat)),
        shader: asset_server.load(PAINTERLY_SHADER),
        shader_checked: false,
    });
}

/// Fall back to the flat material when the painterly shader cannot load
pub fn watch_painterly_shader(
    asset_server: Res<AssetServer>,
    mut materials: ResMut<ObjectMaterials>,
    mut gallery: ResMut<Gallery>,
) {
    if materials.shader_checked {
        return;
    }
    match asset_server.load_state(materials.shader.id()) {
        LoadState::Loaded => materials.shader_checked = true,
        LoadState::Failed(err) => {
            materials.shader_checked = true;
            gallery.0.report_shader_failure(&err.to_string());
        }
        _ => {}
    }
}

/// Place the object and keep its material in step with the gallery
pub fn sync_exhibit_object(
    mut commands: Commands,
    recorder: Res<FrameRecorder>,
    materials: Res<ObjectMaterials>,
    mut painterly: ResMut<Assets<PainterlyMaterial>>,
    mut objects: Query<(Entity, &mut Transform, Option<&AppliedMaterial>, Has<PlaceholderObject>), With<ExhibitObject>>,
) {
    let Some(frame) = &recorder.frame else {
        return;
    };

    let choice = frame.material.choice;
    if choice == MaterialChoice::Painterly
        && let Some(mut material) = painterly.get_mut(materials.painterly.id())
    {
        material.uniform = painterly_uniform(&frame.material, frame.animation_time);
    }

    for (entity, mut object_transform, applied, placeholder) in &mut objects {
        if let Some(affine) = frame.object_transform {
            *object_transform = transform(affine);
        }
        // Placeholders keep their gray material
        if placeholder || applied.is_some_and(|a| a.0 == choice) {
            continue;
        }

        let mut entity = commands.entity(entity);
        entity
            .remove::<MeshMaterial3d<PainterlyMaterial>>()
            .remove::<MeshMaterial3d<StandardMaterial>>();
        match choice {
            MaterialChoice::Painterly => entity.insert(MeshMaterial3d(materials.painterly.clone())),
            MaterialChoice::Standard => entity.insert(MeshMaterial3d(materials.standard.clone())),
            MaterialChoice::Flat => entity.insert(MeshMaterial3d(materials.flat.clone())),
        };
        entity.insert(AppliedMaterial(choice));
        info!("Exhibit material set to {:?}", choice);
    }
}

/// Remove the object once the gallery no longer has one
pub fn clear_stale_object(
    mut commands: Commands,
    recorder: Res<FrameRecorder>,
    objects: Query<Entity, With<ExhibitObject>>,
) {
    if recorder.frame.as_ref().is_some_and(|f| f.object_transform.is_none()) {
        for entity in &objects {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighting::{PainterlyParams, PainterlyPreset};

    fn frame(light_position: Option<glam::Vec3>) -> MaterialFrame {
        MaterialFrame {
            choice: MaterialChoice::Painterly,
            params: PainterlyPreset::Rembrandt.apply(&PainterlyParams::default()),
            light_position,
        }
    }

    #[test]
    fn test_uniform_packs_params() {
        let f = frame(Some(glam::Vec3::new(-3.0, 4.0, 2.0)));
        let u = painterly_uniform(&f, 2.5);
        assert_eq!(u.light_position, Vec4::new(-3.0, 4.0, 2.0, 1.0));
        assert_eq!(u.tone.x, f.params.shadow_contrast);
        assert_eq!(u.tone.w, f.params.scatter_amount);
        assert_eq!(u.soft.y, f.params.sss_intensity);
        assert_eq!(u.soft.z, 2.5);
        // Colors are linearised
        assert!(u.base_color.x < f.params.base_color.x);
        assert_eq!(u.base_color.w, 1.0);
    }

    #[test]
    fn test_missing_key_light_flags_w() {
        let u = painterly_uniform(&frame(None), 0.0);
        assert_eq!(u.light_position.w, 0.0);
    }

    #[test]
    fn test_shader_tone_maps_like_reference() {
        let source = include_str!("shaders/painterly.wgsl");
        let reinhard = source.find("color = color / (color + vec3<f32>(1.0));");
        let trim = source.find("color = pow(color, vec3<f32>(0.95));");
        assert!(reinhard.is_some() && trim.is_some());
        assert!(reinhard < trim);
        // Gamma is left to the sRGB target
        assert!(!source.contains("1.0 / 2.2"));
    }

    #[test]
    fn test_fallback_materials() {
        let flat = MaterialChoice::Flat.surface().map(standard_material);
        assert!(flat.is_some_and(|m| (m.perceptual_roughness - 0.7).abs() < 1e-6 && (m.metallic - 0.1).abs() < 1e-6));
        assert!(MaterialChoice::Painterly.surface().is_none());
    }
}
