//! Floor, ceiling and walls of the gallery room.

use bevy::prelude::*;
use lighting::{STONE_COLOR, rgb_from_hex};
use sfumato_config::{GalleryConfig, RoomConfig};

use crate::convert::color;

/// Part of the room shell
#[derive(Component, Debug, Clone, Copy)]
pub struct RoomSurface;

/// Warm off-white wall paint
const WALL_COLOR: u32 = 0xeae6df;

/// Planes making up the room: (centre, inward normal, half size)
pub fn room_planes(room: &RoomConfig) -> Vec<(Vec3, Vec3, Vec2)> {
    let (w, d, h) = (room.width / 2.0, room.depth / 2.0, room.ceiling_height);
    vec![
        (Vec3::ZERO, Vec3::Y, Vec2::new(w, d)),
        (Vec3::new(0.0, h, 0.0), Vec3::NEG_Y, Vec2::new(w, d)),
        (Vec3::new(0.0, h / 2.0, -d), Vec3::Z, Vec2::new(w, h / 2.0)),
        (Vec3::new(w, h / 2.0, 0.0), Vec3::NEG_X, Vec2::new(d, h / 2.0)),
        (Vec3::new(0.0, h / 2.0, d), Vec3::NEG_Z, Vec2::new(w, h / 2.0)),
        (Vec3::new(-w, h / 2.0, 0.0), Vec3::X, Vec2::new(d, h / 2.0)),
    ]
}

pub fn spawn_room(
    mut commands: Commands,
    config: Res<GalleryConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let floor = materials.add(StandardMaterial {
        base_color: color(rgb_from_hex(STONE_COLOR)),
        perceptual_roughness: 0.9,
        ..default()
    });
    let wall = materials.add(StandardMaterial {
        base_color: color(rgb_from_hex(WALL_COLOR)),
        perceptual_roughness: 0.95,
        ..default()
    });

    for (index, (center, normal, half_size)) in room_planes(&config.room).into_iter().enumerate() {
        let material = if index == 0 { floor.clone() } else { wall.clone() };
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::new(normal, half_size).mesh())),
            MeshMaterial3d(material),
            Transform::from_translation(center),
            RoomSurface,
        ));
    }
    info!("Gallery room {} x {} m", config.room.width, config.room.depth);
}
