//! Painting quads and gray placeholders hung on the gallery walls.

use bevy::prelude::*;
use lighting::{Painting, PaintingStatus};

use crate::convert::vec3;
use crate::engine::FrameRecorder;
use crate::exhibit::{ExhibitLoading, placeholder_material};

/// A painting whose image has loaded
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HungPainting(pub usize);

/// Gray stand-in for a painting that failed to load
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderPainting(pub usize);

/// Placement of a painting quad. Rectangles face +Z before rotation.
pub fn painting_transform(painting: &Painting) -> Transform {
    Transform::from_translation(vec3(painting.slot.position)).with_rotation(Quat::from_rotation_y(painting.slot.yaw()))
}

/// Spawn quads for paintings that finished loading or failed
pub fn sync_paintings(
    mut commands: Commands,
    recorder: Res<FrameRecorder>,
    loading: Res<ExhibitLoading>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    hung: Query<&HungPainting>,
    placeholders: Query<&PlaceholderPainting>,
) {
    let Some(frame) = &recorder.frame else {
        return;
    };

    for (index, painting) in frame.paintings.iter().enumerate() {
        let mesh = || Rectangle::new(painting.size.x, painting.size.y);
        match painting.status {
            PaintingStatus::Pending => {}
            PaintingStatus::Ready => {
                if hung.iter().any(|h| h.0 == index) {
                    continue;
                }
                let Some(image) = loading.image(index) else {
                    continue;
                };
                commands.spawn((
                    Mesh3d(meshes.add(mesh())),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color_texture: Some(image),
                        perceptual_roughness: 0.8,
                        ..default()
                    })),
                    painting_transform(painting),
                    HungPainting(index),
                    Name::new(format!("Painting {index}")),
                ));
            }
            PaintingStatus::Placeholder => {
                if placeholders.iter().any(|p| p.0 == index) {
                    continue;
                }
                commands.spawn((
                    Mesh3d(meshes.add(mesh())),
                    MeshMaterial3d(materials.add(placeholder_material())),
                    painting_transform(painting),
                    PlaceholderPainting(index),
                    Name::new(format!("Placeholder {index}")),
                ));
            }
        }
    }
}

/// Remove paintings from a previous exhibit
pub fn clear_stale_paintings(
    mut commands: Commands,
    recorder: Res<FrameRecorder>,
    hung: Query<(Entity, &HungPainting)>,
) {
    let Some(frame) = &recorder.frame else {
        return;
    };
    for (entity, painting) in &hung {
        let still_hung = frame
            .paintings
            .get(painting.0)
            .is_some_and(|p| p.status == PaintingStatus::Ready);
        if !still_hung {
            commands.entity(entity).despawn();
        }
    }
}
