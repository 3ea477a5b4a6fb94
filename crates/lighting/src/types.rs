//! Core data types: light descriptions, target surfaces and bounding boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The five light kinds the render engine must support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    Point,
    Spot,
    Directional,
    Area,
}

/// What a light is for within a configuration.
///
/// Ambient and fill lights are suppressed in spot-only mode; key lights are
/// the primary lights the user intensity slider drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRole {
    Ambient,
    Fill,
    Key,
}

/// Cone parameters of a spot light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotBeam {
    /// Half-angle of the cone in radians
    pub beam_angle: f32,
    /// Fraction of the cone that fades out (0 = hard edge, 1 = fully soft)
    pub penumbra: f32,
    /// Distance at which the light reaches zero
    pub falloff_distance: f32,
    /// Distance attenuation exponent
    pub decay: f32,
}

impl Default for SpotBeam {
    fn default() -> Self {
        Self {
            beam_angle: 40f32.to_radians(),
            penumbra: 0.3,
            falloff_distance: 30.0,
            decay: 1.5,
        }
    }
}

/// Geometry of a light. Each variant carries exactly what its kind needs:
/// ambient lights have no position, spot and directional lights always have
/// a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightShape {
    Ambient,
    Point {
        position: Vec3,
        range: f32,
    },
    Spot {
        position: Vec3,
        target: Vec3,
        beam: SpotBeam,
    },
    Directional {
        position: Vec3,
        target: Vec3,
    },
    Area {
        position: Vec3,
        target: Vec3,
        width: f32,
        height: f32,
    },
}

impl LightShape {
    pub fn kind(&self) -> LightKind {
        match self {
            LightShape::Ambient => LightKind::Ambient,
            LightShape::Point { .. } => LightKind::Point,
            LightShape::Spot { .. } => LightKind::Spot,
            LightShape::Directional { .. } => LightKind::Directional,
            LightShape::Area { .. } => LightKind::Area,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        match *self {
            LightShape::Ambient => None,
            LightShape::Point { position, .. }
            | LightShape::Spot { position, .. }
            | LightShape::Directional { position, .. }
            | LightShape::Area { position, .. } => Some(position),
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        match *self {
            LightShape::Ambient | LightShape::Point { .. } => None,
            LightShape::Spot { target, .. }
            | LightShape::Directional { target, .. }
            | LightShape::Area { target, .. } => Some(target),
        }
    }

    /// Copy of this shape with its position (and target, if any) moved by
    /// the given offsets. Ambient shapes are returned unchanged.
    pub fn displaced(&self, position_offset: Vec3, target_offset: Vec3) -> Self {
        let mut shape = *self;
        match &mut shape {
            LightShape::Ambient => {}
            LightShape::Point { position, .. } => *position += position_offset,
            LightShape::Spot {
                position, target, ..
            }
            | LightShape::Directional { position, target }
            | LightShape::Area {
                position, target, ..
            } => {
                *position += position_offset;
                *target += target_offset;
            }
        }
        shape
    }
}

/// Static description of one light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSpec {
    pub role: LightRole,
    /// RGB color, 0.0-1.0
    pub color: Vec3,
    /// Intensity before any user or mode multiplier, >= 0
    pub base_intensity: f32,
    pub shape: LightShape,
    #[serde(default)]
    pub casts_shadow: bool,
}

impl LightSpec {
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            role: LightRole::Ambient,
            color,
            base_intensity: intensity.max(0.0),
            shape: LightShape::Ambient,
            casts_shadow: false,
        }
    }

    pub fn fill(color: Vec3, intensity: f32, position: Vec3, range: f32) -> Self {
        Self {
            role: LightRole::Fill,
            color,
            base_intensity: intensity.max(0.0),
            shape: LightShape::Point { position, range },
            casts_shadow: false,
        }
    }

    pub fn spot(color: Vec3, intensity: f32, position: Vec3, target: Vec3, beam: SpotBeam) -> Self {
        Self {
            role: LightRole::Key,
            color,
            base_intensity: intensity.max(0.0),
            shape: LightShape::Spot {
                position,
                target,
                beam,
            },
            casts_shadow: false,
        }
    }

    pub fn directional(color: Vec3, intensity: f32, position: Vec3, target: Vec3) -> Self {
        Self {
            role: LightRole::Key,
            color,
            base_intensity: intensity.max(0.0),
            shape: LightShape::Directional { position, target },
            casts_shadow: true,
        }
    }

    pub fn area(
        color: Vec3,
        intensity: f32,
        position: Vec3,
        target: Vec3,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            role: LightRole::Key,
            color,
            base_intensity: intensity.max(0.0),
            shape: LightShape::Area {
                position,
                target,
                width,
                height,
            },
            casts_shadow: false,
        }
    }

    pub fn kind(&self) -> LightKind {
        self.shape.kind()
    }

    /// True for lights turned off in spot-only mode
    pub fn is_suppressible(&self) -> bool {
        matches!(self.role, LightRole::Ambient | LightRole::Fill)
    }
}

/// Axis-aligned bounding box reported by the asset loader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given size centered on a point
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing all points, or `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when the box has no extent along any axis or holds non-finite values
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !size.is_finite() || size.max_element() <= 0.0
    }
}

/// One of the four walls of a rectangular room, named from the viewer's
/// default position looking towards -Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSide {
    Back,
    Right,
    Front,
    Left,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::Back, WallSide::Right, WallSide::Front, WallSide::Left];

    /// Rotation about Y of a painting hung on this wall
    pub fn yaw(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            WallSide::Back => 0.0,
            WallSide::Right => -FRAC_PI_2,
            WallSide::Front => PI,
            WallSide::Left => FRAC_PI_2,
        }
    }

    /// Snap a yaw angle to a wall when it is within 0.1 rad of one
    pub fn from_yaw(yaw: f32) -> Option<Self> {
        use std::f32::consts::TAU;
        WallSide::ALL.into_iter().find(|side| {
            let diff = (yaw - side.yaw()).rem_euclid(TAU);
            diff < 0.1 || diff > TAU - 0.1
        })
    }
}

/// Which way a target surface faces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceFacing {
    Wall { side: WallSide },
    Free { yaw: f32 },
}

impl SurfaceFacing {
    pub fn yaw(&self) -> f32 {
        match *self {
            SurfaceFacing::Wall { side } => side.yaw(),
            SurfaceFacing::Free { yaw } => yaw,
        }
    }

    /// Unit vector pointing from the surface into the room
    pub fn normal(&self) -> Vec3 {
        match *self {
            SurfaceFacing::Wall { side } => match side {
                WallSide::Back => Vec3::Z,
                WallSide::Right => Vec3::NEG_X,
                WallSide::Front => Vec3::NEG_Z,
                WallSide::Left => Vec3::X,
            },
            SurfaceFacing::Free { yaw } => Vec3::new(yaw.sin(), 0.0, yaw.cos()),
        }
    }

    /// Horizontal unit vector along the surface
    pub fn tangent(&self) -> Vec3 {
        self.normal().cross(Vec3::Y)
    }
}

/// The thing being lit: a painting on a wall or an object on a pedestal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSurface {
    /// World-space center of the surface
    pub position: Vec3,
    pub facing: SurfaceFacing,
    /// Width in meters
    pub width: f32,
    /// Height in meters
    pub height: f32,
}

impl TargetSurface {
    pub fn on_wall(position: Vec3, side: WallSide, width: f32, height: f32) -> Self {
        Self {
            position,
            facing: SurfaceFacing::Wall { side },
            width,
            height,
        }
    }

    /// Surface for a free-standing object, derived from its world bounding box
    pub fn from_object_bounds(bounds: &BoundingBox, yaw: f32) -> Self {
        let size = bounds.size();
        Self {
            position: bounds.center(),
            facing: SurfaceFacing::Free { yaw },
            width: size.x.max(size.z),
            height: size.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_invariants() {
        let ambient = LightSpec::ambient(Vec3::ONE, 0.5);
        assert_eq!(ambient.kind(), LightKind::Ambient);
        assert!(ambient.shape.position().is_none());
        assert!(ambient.is_suppressible());

        let spot = LightSpec::spot(Vec3::ONE, 1.0, Vec3::Y * 3.0, Vec3::ZERO, SpotBeam::default());
        assert_eq!(spot.shape.target(), Some(Vec3::ZERO));
        assert!(!spot.is_suppressible());
    }

    #[test]
    fn test_negative_intensity_clamped() {
        let fill = LightSpec::fill(Vec3::ONE, -1.0, Vec3::ZERO, 10.0);
        assert_eq!(fill.base_intensity, 0.0);
    }

    #[test]
    fn test_displaced_moves_target() {
        let spot = LightSpec::spot(Vec3::ONE, 1.0, Vec3::ZERO, Vec3::X, SpotBeam::default());
        let moved = spot.shape.displaced(Vec3::Y, Vec3::Z);
        assert_eq!(moved.position(), Some(Vec3::Y));
        assert_eq!(moved.target(), Some(Vec3::X + Vec3::Z));
    }

    #[test]
    fn test_wall_normals_match_free_yaw() {
        for side in WallSide::ALL {
            let wall = SurfaceFacing::Wall { side }.normal();
            let free = SurfaceFacing::Free { yaw: side.yaw() }.normal();
            assert!((wall - free).length() < 1e-5, "{side:?}");
            assert_eq!(WallSide::from_yaw(side.yaw()), Some(side));
        }
        assert_eq!(WallSide::from_yaw(-std::f32::consts::PI), Some(WallSide::Front));
        assert_eq!(WallSide::from_yaw(0.5), None);
    }

    #[test]
    fn test_bounding_box() {
        let bounds = BoundingBox::from_points([Vec3::ZERO, Vec3::new(2.0, 4.0, -2.0)]).unwrap();
        assert_eq!(bounds.center(), Vec3::new(1.0, 2.0, -1.0));
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 2.0));
        assert!(!bounds.is_degenerate());
        assert!(BoundingBox::new(Vec3::ONE, Vec3::ONE).is_degenerate());
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }
}
