//! The bevy side of the gallery's render engine.
//!
//! The orchestrator runs once per frame and hands its frame to
//! [`FrameRecorder`]. Sync systems later in the frame read the recorded copy
//! and update lights, camera, object and paintings.

use bevy::prelude::*;
use lighting::{
    GalleryOrchestrator, LightHelper, LiveLight, MaterialFrame, OrbitCamera, Painting, RenderEngine,
    RenderFrame, SceneArtifact,
};
use sfumato_config::GalleryConfig;

/// The whole gallery state, mutated by one system per frame
#[derive(Resource)]
pub struct Gallery(pub GalleryOrchestrator);

impl Gallery {
    pub fn new(config: &GalleryConfig) -> Self {
        Self(GalleryOrchestrator::new(config))
    }
}

/// Owned copy of one orchestrator frame
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub animation_time: f32,
    pub lights: Vec<LiveLight>,
    pub helpers: Vec<LightHelper>,
    pub camera: OrbitCamera,
    pub object_transform: Option<glam::Affine3A>,
    pub paintings: Vec<Painting>,
    pub material: MaterialFrame,
}

/// Render engine that records frames for the sync systems
#[derive(Resource, Default)]
pub struct FrameRecorder {
    pub frame: Option<RecordedFrame>,
    released: Vec<SceneArtifact>,
}

impl FrameRecorder {
    /// Take the artifacts released since the last call
    pub fn take_released(&mut self) -> Vec<SceneArtifact> {
        std::mem::take(&mut self.released)
    }
}

impl RenderEngine for FrameRecorder {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.frame = Some(RecordedFrame {
            animation_time: frame.animation_time,
            lights: frame.lights.to_vec(),
            helpers: frame.helpers.clone(),
            camera: frame.camera,
            object_transform: frame.object.map(|o| o.model_matrix()),
            paintings: frame.paintings.to_vec(),
            material: frame.material,
        });
    }

    fn release(&mut self, artifact: &SceneArtifact) {
        self.released.push(*artifact);
    }
}

/// Advance the gallery by one frame
pub fn run_gallery_frame(time: Res<Time>, mut gallery: ResMut<Gallery>, mut recorder: ResMut<FrameRecorder>) {
    gallery.0.frame(time.delta_secs(), recorder.as_mut());
}

/// Release everything when the app exits
pub fn shutdown_gallery(
    mut exit: MessageReader<AppExit>,
    mut gallery: ResMut<Gallery>,
    mut recorder: ResMut<FrameRecorder>,
) {
    if exit.read().next().is_some() {
        gallery.0.shutdown(recorder.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighting::BoundingBox;

    #[test]
    fn test_recorder_keeps_frame_and_releases() {
        let mut gallery = GalleryOrchestrator::new(&GalleryConfig::default());
        let mut recorder = FrameRecorder::default();

        gallery.load_object(BoundingBox::from_center_size(
            glam::Vec3::new(0.0, 20.0, 0.0),
            glam::Vec3::new(2.0, 4.0, 2.0),
        ));
        gallery.frame(1.0 / 60.0, &mut recorder);

        let frame = recorder.frame.clone();
        assert!(frame.as_ref().is_some_and(|f| f.lights.len() == 4));
        assert!(frame.is_some_and(|f| f.object_transform.is_some()));

        assert!(gallery.select_configuration("atelier").is_ok());
        gallery.frame(1.0 / 60.0, &mut recorder);
        let released = recorder.take_released();
        assert_eq!(released.len(), 4);
        assert!(recorder.take_released().is_empty());
    }
}
