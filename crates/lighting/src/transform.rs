//! Object normalization and the rotation pivot.
//!
//! Loaded models come in arbitrary units and offsets. Normalization recentres
//! a model on the origin, scales its largest dimension to the target height
//! and lifts it so its centre sits at that height.

use glam::{Affine3A, EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GalleryError;
use crate::types::BoundingBox;

/// Result of normalizing a model's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransform {
    /// Centre of the source bounding box
    pub source_center: Vec3,
    pub scale: f32,
    pub target_height: f32,
}

impl NormalizedTransform {
    pub fn identity_at(target_height: f32) -> Self {
        Self {
            source_center: Vec3::ZERO,
            scale: 1.0,
            target_height,
        }
    }

    /// Offset applied to the model before scaling
    pub fn center_offset(&self) -> Vec3 {
        -self.source_center
    }

    /// Offset applied after scaling
    pub fn lift(&self) -> Vec3 {
        Vec3::new(0.0, self.target_height, 0.0)
    }

    /// World position of a model-space point
    pub fn apply(&self, point: Vec3) -> Vec3 {
        (point + self.center_offset()) * self.scale + self.lift()
    }

    /// Where the model's centre ends up, which is also the rotation pivot
    pub fn world_center(&self) -> Vec3 {
        self.lift()
    }

    /// Combined translation of the affine transform
    pub fn translation(&self) -> Vec3 {
        self.center_offset() * self.scale + self.lift()
    }

    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.translation())
    }

    pub fn world_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.apply(bounds.min), self.apply(bounds.max))
    }
}

/// Fits models to a target height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransformPlanner {
    pub target_height: f32,
}

impl ObjectTransformPlanner {
    pub fn new(target_height: f32) -> Self {
        Self { target_height }
    }

    pub fn try_normalize(&self, bounds: &BoundingBox) -> Result<NormalizedTransform, GalleryError> {
        let size = bounds.size();
        if bounds.is_degenerate() || !bounds.center().is_finite() {
            return Err(GalleryError::DegenerateGeometry { size: size.to_array() });
        }
        Ok(NormalizedTransform {
            source_center: bounds.center(),
            scale: self.target_height / size.max_element(),
            target_height: self.target_height,
        })
    }

    /// Like [`Self::try_normalize`], falling back to unit scale around the
    /// box centre for degenerate boxes
    pub fn normalize(&self, bounds: &BoundingBox) -> NormalizedTransform {
        self.try_normalize(bounds).unwrap_or_else(|err| {
            warn!("{}, using unit scale", err);
            let center = bounds.center();
            NormalizedTransform {
                source_center: if center.is_finite() { center } else { Vec3::ZERO },
                ..NormalizedTransform::identity_at(self.target_height)
            }
        })
    }
}

/// Rotation pivot placed at the normalized object's centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPivot {
    pub center: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw, z = roll
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for ObjectPivot {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl ObjectPivot {
    pub fn at(center: Vec3) -> Self {
        Self {
            center,
            ..Default::default()
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = Vec3::ZERO;
    }

    /// Rotation and scale about the pivot centre
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_translation(self.center)
            * Affine3A::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), Vec3::ZERO)
            * Affine3A::from_translation(-self.center)
    }

    /// Model-to-world transform of a normalized object on this pivot
    pub fn model_matrix(&self, normalized: &NormalizedTransform) -> Affine3A {
        self.to_affine() * normalized.to_affine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reference_box() {
        let bounds = BoundingBox::from_center_size(Vec3::new(3.0, -1.0, 7.0), Vec3::new(2.0, 4.0, 2.0));
        let t = ObjectTransformPlanner::new(1.5).normalize(&bounds);

        assert!((t.scale - 0.375).abs() < 1e-6);
        let center = t.apply(bounds.center());
        assert!((center - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-6);

        let world = t.world_bounds(&bounds);
        assert!((world.size().y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_affine_matches_apply() {
        let bounds = BoundingBox::new(Vec3::new(-1.0, 0.0, -0.5), Vec3::new(3.0, 2.0, 0.5));
        let t = ObjectTransformPlanner::new(1.5).normalize(&bounds);
        let affine = t.to_affine();
        for p in [bounds.min, bounds.max, Vec3::new(0.3, 1.7, -0.2)] {
            let a = affine.transform_point3(p);
            assert!((a - t.apply(p)).length() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_uses_unit_scale() {
        let flat = BoundingBox::new(Vec3::ONE, Vec3::ONE);
        let planner = ObjectTransformPlanner::new(1.5);
        assert!(matches!(
            planner.try_normalize(&flat),
            Err(GalleryError::DegenerateGeometry { .. })
        ));
        let t = planner.normalize(&flat);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.apply(Vec3::ONE), Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_pivot_rotates_about_center() {
        let mut pivot = ObjectPivot::at(Vec3::new(0.0, 1.5, 0.0));
        pivot.rotation.y = std::f32::consts::FRAC_PI_2;
        let affine = pivot.to_affine();

        assert!((affine.transform_point3(pivot.center) - pivot.center).length() < 1e-6);
        let moved = affine.transform_point3(Vec3::new(1.0, 1.5, 0.0));
        assert!((moved - Vec3::new(0.0, 1.5, -1.0)).length() < 1e-5);
    }
}
