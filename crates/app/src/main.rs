//! Sfumato - painterly gallery viewer

use bevy::prelude::*;
use bevy::window::WindowResolution;
use sfumato_scene::GalleryPlugin;

mod config;
mod stdio_ipc;

use config::{IpcMode, LaunchConfig};

/// Launch problems, logged on the first frame once logging is up
#[derive(Resource)]
struct LaunchWarnings(Vec<String>);

fn log_launch_warnings(warnings: Res<LaunchWarnings>) {
    for warning in &warnings.0 {
        warn!("{}", warning);
    }
}

fn main() {
    let launch = LaunchConfig::from_env();

    let display = &launch.gallery.display;

    let mut resolution = WindowResolution::new(display.width, display.height);
    if display.scale != 1.0 {
        resolution = resolution.with_scale_factor_override(display.scale);
    }

    let window_config = Window {
        title: "Sfumato".into(),
        resolution,
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    app.insert_resource(launch.exhibit.clone())
        .insert_resource(LaunchWarnings(launch.warnings.clone()));

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    app.add_plugins(GalleryPlugin {
        config: launch.gallery.clone(),
    })
    .add_systems(Startup, log_launch_warnings);

    if launch.ipc == IpcMode::Stdio {
        app.add_plugins(stdio_ipc::StdioIpcPlugin);
    }

    app.run();
}
