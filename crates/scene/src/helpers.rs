//! Light helper gizmos.

use bevy::prelude::*;
use lighting::{HelperShape, LightHelper};

use crate::convert::{color, vec3};
use crate::engine::FrameRecorder;

/// Spokes drawn from a cone's apex to its rim
const CONE_SPOKES: usize = 8;

/// Rotation taking +Z onto `direction`
fn facing(direction: Vec3) -> Quat {
    if direction.length_squared() < 1e-12 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Z, direction.normalize())
}

/// Points on a cone's rim, for drawing spokes
pub fn cone_rim(apex: Vec3, direction: Vec3, length: f32, radius: f32) -> Vec<Vec3> {
    let rotation = facing(direction);
    let base = apex + direction.normalize_or_zero() * length;
    (0..CONE_SPOKES)
        .map(|i| {
            let angle = i as f32 / CONE_SPOKES as f32 * std::f32::consts::TAU;
            base + rotation * Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect()
}

fn draw_helper(gizmos: &mut Gizmos, helper: &LightHelper) {
    let tint = color(helper.color).with_alpha(helper.opacity.max(0.2));
    match helper.shape {
        HelperShape::Cone {
            apex,
            direction,
            length,
            radius,
        } => {
            let (apex, direction) = (vec3(apex), vec3(direction));
            let base = apex + direction.normalize_or_zero() * length;
            gizmos.circle(Isometry3d::new(base, facing(direction)), radius, tint);
            for rim in cone_rim(apex, direction, length, radius) {
                gizmos.line(apex, rim, tint);
            }
        }
        HelperShape::Orb { center, radius } => {
            gizmos.sphere(Isometry3d::from_translation(vec3(center)), radius, tint);
        }
        HelperShape::Panel {
            center,
            normal,
            width,
            height,
        } => {
            let center = vec3(center);
            let normal = vec3(normal);
            gizmos.rect(Isometry3d::new(center, facing(normal)), Vec2::new(width, height), tint);
            gizmos.arrow(center, center + normal.normalize_or_zero() * 0.5, tint);
        }
        HelperShape::Arrow {
            origin,
            direction,
            length,
        } => {
            let origin = vec3(origin);
            gizmos.arrow(origin, origin + vec3(direction) * length, tint);
        }
    }
}

pub fn draw_light_helpers(recorder: Res<FrameRecorder>, mut gizmos: Gizmos) {
    let Some(frame) = &recorder.frame else {
        return;
    };
    for helper in &frame.helpers {
        draw_helper(&mut gizmos, helper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_rim_on_base_circle() {
        let apex = Vec3::new(0.0, 5.0, 0.0);
        let direction = Vec3::new(0.0, -1.0, 1.0).normalize();
        let rim = cone_rim(apex, direction, 4.0, 1.5);
        assert_eq!(rim.len(), CONE_SPOKES);

        let base = apex + direction * 4.0;
        for point in rim {
            assert!((point.distance(base) - 1.5).abs() < 1e-4);
            // Rim lies in the plane perpendicular to the axis
            assert!((point - base).dot(direction).abs() < 1e-4);
        }
    }
}
