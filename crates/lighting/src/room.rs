//! Hanging paintings around a rectangular room.
//!
//! Paintings fill the walls in order back, right, front, left, with
//! `ceil(n / 4)` per wall, each wall walked from its left corner as seen
//! from inside the room.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sfumato_config::RoomConfig;

use crate::constants::{MAX_PAINTING_HEIGHT, MAX_PAINTING_WIDTH, PLACEHOLDER_SIZE};
use crate::types::{SurfaceFacing, TargetSurface, WallSide};

/// Where one painting hangs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSlot {
    pub side: WallSide,
    /// Centre of the painting, slightly in front of the wall
    pub position: Vec3,
}

impl WallSlot {
    pub fn yaw(&self) -> f32 {
        self.side.yaw()
    }

    pub fn surface(&self, size: Vec2) -> TargetSurface {
        TargetSurface::on_wall(self.position, self.side, size.x, size.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    pub room: RoomConfig,
}

impl RoomLayout {
    pub fn new(room: RoomConfig) -> Self {
        Self { room }
    }

    fn wall_length(&self, side: WallSide) -> f32 {
        match side {
            WallSide::Back | WallSide::Front => self.room.width,
            WallSide::Right | WallSide::Left => self.room.depth,
        }
    }

    /// Distance from the room centre to the wall plane
    fn wall_distance(&self, side: WallSide) -> f32 {
        match side {
            WallSide::Back | WallSide::Front => self.room.depth / 2.0,
            WallSide::Right | WallSide::Left => self.room.width / 2.0,
        }
    }

    /// Gap between neighbouring paintings on a wall holding `count`
    pub fn spacing(&self, count: usize, wall_length: f32) -> f32 {
        if count <= 1 {
            return 0.0;
        }
        let available = wall_length - self.room.wall_margin * 2.0;
        (available / (count - 1) as f32).max(self.room.min_spacing)
    }

    /// Slots for `count` paintings, in painting order
    pub fn place(&self, count: usize) -> Vec<WallSlot> {
        if count == 0 {
            return Vec::new();
        }
        let per_wall = count.div_ceil(4);

        (0..count)
            .map(|index| {
                let wall = (index / per_wall).min(3);
                let slot = index % per_wall;
                let side = WallSide::ALL[wall];
                let on_wall = per_wall.min(count - wall * per_wall);

                let facing = SurfaceFacing::Wall { side };
                let normal = facing.normal();
                let walk = -facing.tangent();
                let length = self.wall_length(side);

                let wall_center = -normal * (self.wall_distance(side) - self.room.wall_inset);
                let start = wall_center + walk * (-length / 2.0 + self.room.wall_margin);
                let mut position = start + walk * (slot as f32 * self.spacing(on_wall, length));
                position.y = self.room.hang_height;

                WallSlot { side, position }
            })
            .collect()
    }
}

/// Physical size of a painting in meters.
///
/// Explicit dimensions in centimetres win. Otherwise the image aspect ratio
/// is fitted into the largest allowed frame. Without either, the placeholder
/// size is used.
pub fn fit_painting_size(dimensions_cm: Option<Vec2>, image_size: Option<(u32, u32)>) -> Vec2 {
    if let Some(cm) = dimensions_cm.filter(|d| d.is_finite() && d.min_element() > 0.0) {
        return cm / 100.0;
    }

    match image_size {
        Some((width, height)) if width > 0 && height > 0 => {
            let aspect = height as f32 / width as f32;
            if aspect > MAX_PAINTING_HEIGHT / MAX_PAINTING_WIDTH {
                Vec2::new(MAX_PAINTING_HEIGHT / aspect, MAX_PAINTING_HEIGHT)
            } else {
                Vec2::new(MAX_PAINTING_WIDTH, MAX_PAINTING_WIDTH * aspect)
            }
        }
        _ => Vec2::splat(PLACEHOLDER_SIZE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RoomLayout {
        RoomLayout::new(RoomConfig::default())
    }

    #[test]
    fn test_eight_paintings_two_per_wall() {
        let slots = layout().place(8);
        let sides: Vec<WallSide> = slots.iter().map(|s| s.side).collect();
        assert_eq!(
            sides,
            [
                WallSide::Back,
                WallSide::Back,
                WallSide::Right,
                WallSide::Right,
                WallSide::Front,
                WallSide::Front,
                WallSide::Left,
                WallSide::Left
            ]
        );

        // Back wall, left to right from the corner margin
        assert!((slots[0].position - Vec3::new(-27.0, 1.5, -24.95)).length() < 1e-4);
        assert!((slots[1].position - Vec3::new(27.0, 1.5, -24.95)).length() < 1e-4);
        // Right wall, back to front
        assert!((slots[2].position - Vec3::new(29.95, 1.5, -22.0)).length() < 1e-4);
        // Front wall, right to left
        assert!((slots[4].position - Vec3::new(27.0, 1.5, 24.95)).length() < 1e-4);
        // Left wall, front to back
        assert!((slots[6].position - Vec3::new(-29.95, 1.5, 22.0)).length() < 1e-4);
    }

    #[test]
    fn test_slots_face_into_room() {
        for slot in layout().place(12) {
            let inward = SurfaceFacing::Wall { side: slot.side }.normal();
            assert!(inward.dot(-slot.position) > 0.0, "{slot:?}");
        }
    }

    #[test]
    fn test_single_painting_sits_at_margin() {
        let slots = layout().place(1);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].side, WallSide::Back);
        assert!((slots[0].position.x + 27.0).abs() < 1e-4);
    }

    #[test]
    fn test_spacing_floor() {
        let l = layout();
        assert_eq!(l.spacing(1, 60.0), 0.0);
        assert!((l.spacing(4, 60.0) - 18.0).abs() < 1e-5);
        assert_eq!(l.spacing(100, 60.0), 2.0);
    }

    #[test]
    fn test_fit_painting_size() {
        assert_eq!(fit_painting_size(Some(Vec2::new(120.0, 80.0)), Some((10, 10))), Vec2::new(1.2, 0.8));
        // Landscape image fills the width
        assert_eq!(fit_painting_size(None, Some((2000, 1000))), Vec2::new(2.5, 1.25));
        // Portrait image fills the height
        let portrait = fit_painting_size(None, Some((1000, 2000)));
        assert!((portrait - Vec2::new(1.0, 2.0)).length() < 1e-6);
        assert_eq!(fit_painting_size(Some(Vec2::ZERO), None), Vec2::splat(2.0));
    }
}
