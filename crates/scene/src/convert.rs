//! Conversions from the lighting crate's math types to bevy's.

use bevy::prelude::*;

pub fn vec3(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

/// Light and surface colors are authored as sRGB hex values
pub fn color(rgb: glam::Vec3) -> Color {
    Color::srgb(rgb.x, rgb.y, rgb.z)
}

pub fn transform(affine: glam::Affine3A) -> Transform {
    let matrix = glam::Mat4::from(affine);
    Transform::from_matrix(Mat4::from_cols_array(&matrix.to_cols_array()))
}

/// Transform at `position` facing `target`. Straight-down aims fall back to
/// +Z as the up vector.
pub fn aimed(position: Vec3, target: Vec3) -> Transform {
    let forward = (target - position).normalize_or_zero();
    let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    Transform::from_translation(position).looking_at(target, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aimed_faces_target() {
        let t = aimed(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 1.0, -2.0));
        let forward = t.forward().as_vec3();
        let expected = (Vec3::new(3.0, -4.0, -2.0)).normalize();
        assert!((forward - expected).length() < 1e-5);
    }

    #[test]
    fn test_aimed_straight_down_is_finite() {
        let t = aimed(Vec3::new(1.0, 6.0, 1.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(t.rotation.is_finite());
        assert!((t.forward().as_vec3() - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_transform_from_affine() {
        let affine = glam::Affine3A::from_scale_rotation_translation(
            glam::Vec3::splat(0.5),
            glam::Quat::IDENTITY,
            glam::Vec3::new(1.0, 2.0, 3.0),
        );
        let t = transform(affine);
        assert!((t.translation - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert!((t.scale - Vec3::splat(0.5)).length() < 1e-6);
    }
}
