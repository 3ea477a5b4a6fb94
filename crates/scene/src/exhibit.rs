//! Exhibit loading: one object from a glTF file, or a gallery of paintings.
//!
//! The asset server does the loading. These systems poll load states and
//! report finished assets to the gallery exactly once.

use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use lighting::{BoundingBox, PLACEHOLDER_COLOR, rgb_from_hex};

use crate::convert::color;
use crate::engine::Gallery;
use crate::material::{ExhibitObject, PlaceholderObject};

/// Painting image plus optional physical size
#[derive(Debug, Clone, PartialEq)]
pub struct PaintingSource {
    pub path: String,
    /// Width and height in centimetres
    pub dimensions_cm: Option<[f32; 2]>,
}

/// What the gallery shows
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum Exhibit {
    #[default]
    Empty,
    /// A single glTF object, its first mesh primitive is used
    Object { path: String },
    Paintings(Vec<PaintingSource>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Loading,
    Done,
}

#[derive(Debug)]
struct PendingPainting {
    handle: Handle<Image>,
    dimensions_cm: Option<Vec2>,
    progress: Progress,
}

/// Handles of everything the current exhibit is waiting on
#[derive(Resource, Debug, Default)]
pub struct ExhibitLoading {
    object: Option<(Handle<Mesh>, Progress)>,
    paintings: Vec<PendingPainting>,
}

impl ExhibitLoading {
    /// Image of painting `index`, once it has loaded
    pub fn image(&self, index: usize) -> Option<Handle<Image>> {
        self.paintings
            .get(index)
            .filter(|p| p.progress == Progress::Done)
            .map(|p| p.handle.clone())
    }
}

/// Model-space bounds of a mesh's positions
pub fn mesh_bounds(mesh: &Mesh) -> Option<BoundingBox> {
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
        return None;
    };
    BoundingBox::from_points(positions.iter().map(|p| glam::Vec3::from_array(*p)))
}

/// Neutral gray material shared by placeholder geometry
pub fn placeholder_material() -> StandardMaterial {
    StandardMaterial {
        base_color: color(rgb_from_hex(PLACEHOLDER_COLOR)),
        perceptual_roughness: 0.9,
        ..default()
    }
}

/// Unit cube shown in place of an object that failed to load. The gallery
/// positions it like any other object.
fn spawn_placeholder_object(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
        MeshMaterial3d(materials.add(placeholder_material())),
        Transform::default(),
        ExhibitObject,
        PlaceholderObject,
        Name::new("Exhibit placeholder"),
    ));
}

/// Kick off loading for the configured exhibit
pub fn start_exhibit_loading(
    exhibit: Res<Exhibit>,
    asset_server: Res<AssetServer>,
    mut loading: ResMut<ExhibitLoading>,
    mut gallery: ResMut<Gallery>,
) {
    match exhibit.as_ref() {
        Exhibit::Empty => info!("No exhibit configured"),
        Exhibit::Object { path } => {
            info!("Loading exhibit object {}", path);
            let handle = asset_server.load(GltfAssetLabel::Primitive { mesh: 0, primitive: 0 }.from_asset(path.clone()));
            loading.object = Some((handle, Progress::Loading));
        }
        Exhibit::Paintings(sources) => {
            info!("Loading {} paintings", sources.len());
            gallery.0.begin_gallery(sources.len());
            loading.paintings = sources
                .iter()
                .map(|source| PendingPainting {
                    handle: asset_server.load(source.path.clone()),
                    dimensions_cm: source.dimensions_cm.map(Vec2::from_array),
                    progress: Progress::Loading,
                })
                .collect();
        }
    }
}

/// Report loaded or failed exhibit assets to the gallery
pub fn track_exhibit_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    images: Res<Assets<Image>>,
    mut loading: ResMut<ExhibitLoading>,
    mut gallery: ResMut<Gallery>,
) {
    if let Some((handle, progress)) = &mut loading.object
        && *progress == Progress::Loading
    {
        match asset_server.load_state(handle.id()) {
            LoadState::Loaded => {
                *progress = Progress::Done;
                match meshes.get(handle.id()).and_then(mesh_bounds) {
                    Some(bounds) => {
                        gallery.0.load_object(bounds);
                        commands.spawn((Mesh3d(handle.clone()), Transform::default(), ExhibitObject, Name::new("Exhibit")));
                    }
                    None => {
                        gallery.0.asset_failed(None, "exhibit mesh has no positions");
                        spawn_placeholder_object(&mut commands, &mut meshes, &mut materials);
                    }
                }
            }
            LoadState::Failed(err) => {
                *progress = Progress::Done;
                gallery.0.asset_failed(None, &err.to_string());
                spawn_placeholder_object(&mut commands, &mut meshes, &mut materials);
            }
            _ => {}
        }
    }

    for (index, painting) in loading.paintings.iter_mut().enumerate() {
        if painting.progress == Progress::Done {
            continue;
        }
        match asset_server.load_state(painting.handle.id()) {
            LoadState::Loaded => {
                painting.progress = Progress::Done;
                let size = images.get(painting.handle.id()).map(|image| (image.width(), image.height()));
                let dimensions = painting.dimensions_cm.map(|d| glam::Vec2::from_array(d.to_array()));
                gallery.0.painting_ready(index, dimensions, size);
            }
            LoadState::Failed(err) => {
                painting.progress = Progress::Done;
                gallery.0.asset_failed(Some(index), &err.to_string());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = Mesh::from(Cuboid::new(2.0, 4.0, 2.0));
        let bounds = mesh_bounds(&mesh);
        assert!(bounds.is_some_and(|b| b.size() == glam::Vec3::new(2.0, 4.0, 2.0)));
        assert!(bounds.is_some_and(|b| b.center() == glam::Vec3::ZERO));
    }

    #[test]
    fn test_placeholder_cube_matches_gallery_bounds() {
        let bounds = mesh_bounds(&Mesh::from(Cuboid::new(1.0, 1.0, 1.0)));
        assert!(bounds.is_some_and(|b| b.size() == glam::Vec3::ONE && b.center() == glam::Vec3::ZERO));
        let material = placeholder_material();
        assert_eq!(material.base_color, color(rgb_from_hex(PLACEHOLDER_COLOR)));
    }

    #[test]
    fn test_mesh_without_positions() {
        let mesh = Mesh::new(
            bevy::mesh::PrimitiveTopology::TriangleList,
            bevy::asset::RenderAssetUsages::default(),
        );
        assert!(mesh_bounds(&mesh).is_none());
    }

    #[test]
    fn test_only_finished_paintings_expose_images() {
        let loading = ExhibitLoading {
            object: None,
            paintings: vec![
                PendingPainting {
                    handle: Handle::default(),
                    dimensions_cm: None,
                    progress: Progress::Loading,
                },
                PendingPainting {
                    handle: Handle::default(),
                    dimensions_cm: None,
                    progress: Progress::Done,
                },
            ],
        };
        assert!(loading.image(0).is_none());
        assert!(loading.image(1).is_some());
        assert!(loading.image(2).is_none());
    }
}
