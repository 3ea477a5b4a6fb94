//! Main camera driven by the gallery's orbit camera.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use lighting::OrbitCamera;

use crate::convert::vec3;
use crate::engine::FrameRecorder;

/// Tonemapping for standard materials. The view is not HDR, so bevy applies
/// it inside the PBR shader and the painterly shader keeps its own Reinhard.
pub const SCENE_TONEMAPPING: Tonemapping = Tonemapping::AcesFitted;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

pub fn camera_transform(orbit: &OrbitCamera) -> Transform {
    let position = vec3(orbit.calculate_position());
    Transform::from_translation(position).looking_at(vec3(orbit.target), Vec3::Y)
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        camera_transform(&OrbitCamera::default()),
        SCENE_TONEMAPPING,
        MainCamera,
    ));
}

/// Follow the orbit camera the gallery produced this frame
pub fn sync_camera(recorder: Res<FrameRecorder>, mut cameras: Query<&mut Transform, With<MainCamera>>) {
    let Some(frame) = &recorder.frame else {
        return;
    };
    for mut transform in &mut cameras {
        *transform = camera_transform(&frame.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_looks_at_target() {
        let orbit = OrbitCamera::default();
        let transform = camera_transform(&orbit);
        let to_target = (vec3(orbit.target) - transform.translation).normalize();
        assert!((transform.forward().as_vec3() - to_target).length() < 1e-5);
        assert!((transform.translation.distance(vec3(orbit.target)) - orbit.distance).abs() < 1e-4);
    }

    #[test]
    fn test_scene_tonemapping_is_not_reinhard() {
        // Reinhard here would map the painterly output a second time
        assert_ne!(SCENE_TONEMAPPING, Tonemapping::Reinhard);
        assert_ne!(SCENE_TONEMAPPING, Tonemapping::None);
    }
}
