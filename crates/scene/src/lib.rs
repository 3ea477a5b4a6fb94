//! Bevy integration for the Sfumato gallery
//!
//! The engine-independent gallery lives in the `lighting` crate. This crate
//! runs it inside a bevy app: it feeds it input and loaded assets, and
//! mirrors each frame as bevy lights, camera, materials and meshes.

use bevy::prelude::*;
use sfumato_config::GalleryConfig;

mod bridge;
mod camera;
mod convert;
mod engine;
mod exhibit;
mod helpers;
mod input;
mod lights;
mod material;
mod paintings;
mod room;

pub use bridge::{InboundUiMessages, OutboundUiMessages};
pub use camera::MainCamera;
pub use engine::{FrameRecorder, Gallery, RecordedFrame};
pub use exhibit::{Exhibit, ExhibitLoading, PaintingSource};
pub use lights::GalleryLight;
pub use material::{ExhibitObject, PainterlyMaterial, PainterlyMaterialPlugin, PainterlyUniform, PlaceholderObject};
pub use paintings::{HungPainting, PlaceholderPainting};

pub struct GalleryPlugin {
    pub config: GalleryConfig,
}

impl Plugin for GalleryPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(Gallery::new(&self.config))
            .init_resource::<Exhibit>()
            .init_resource::<ExhibitLoading>()
            .init_resource::<FrameRecorder>()
            .init_resource::<input::PointerState>()
            .init_resource::<InboundUiMessages>()
            .init_resource::<OutboundUiMessages>();

        app.add_plugins(PainterlyMaterialPlugin);

        app.add_systems(
            Startup,
            (camera::spawn_camera, room::spawn_room, exhibit::start_exhibit_loading),
        );

        // One pass per frame: input, assets, gallery frame, then mirror it
        app.add_systems(
            Update,
            (
                bridge::apply_ui_messages,
                input::forward_pointer_input,
                exhibit::track_exhibit_loading,
                material::watch_painterly_shader,
                engine::run_gallery_frame,
                lights::release_artifacts,
                (
                    lights::sync_lights,
                    camera::sync_camera,
                    material::clear_stale_object,
                    material::sync_exhibit_object,
                    paintings::clear_stale_paintings,
                    paintings::sync_paintings,
                    helpers::draw_light_helpers,
                )
                    .chain(),
                bridge::publish_gallery_events,
            )
                .chain(),
        );

        app.add_systems(Last, engine::shutdown_gallery);
    }
}
