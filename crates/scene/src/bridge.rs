//! IPC bridge between UI messages and the gallery.
//!
//! The host drains [`OutboundUiMessages`] and fills [`InboundUiMessages`];
//! this module maps between the wire types and the gallery's own types.

use bevy::prelude::*;
use lighting::{
    GalleryEvent, GallerySnapshot, MaterialChoice, PainterlyParams, PainterlyPreset, PointerButton, PointerInput,
    RotationMode,
};
use sfumato_ipc::{
    ConfigurationInfo, GalleryState, GalleryToUi, MaterialKind, MouseButton, MouseEvent, PainterlySettings, Preset,
    RotationMode as IpcRotationMode, UiToGallery,
};

use crate::engine::Gallery;

/// Resource for queuing messages to send to the UI
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<GalleryToUi>,
}

impl OutboundUiMessages {
    pub fn send(&mut self, msg: GalleryToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<GalleryToUi> {
        std::mem::take(&mut self.messages)
    }
}

/// Messages received from the UI, applied once per frame
#[derive(Resource, Default)]
pub struct InboundUiMessages {
    pub messages: Vec<UiToGallery>,
}

impl InboundUiMessages {
    pub fn push(&mut self, msg: UiToGallery) {
        self.messages.push(msg);
    }
}

pub fn preset_from_ipc(preset: Preset) -> PainterlyPreset {
    match preset {
        Preset::DaVinci => PainterlyPreset::DaVinci,
        Preset::Caravaggio => PainterlyPreset::Caravaggio,
        Preset::Rembrandt => PainterlyPreset::Rembrandt,
    }
}

fn preset_to_ipc(preset: PainterlyPreset) -> Preset {
    match preset {
        PainterlyPreset::DaVinci => Preset::DaVinci,
        PainterlyPreset::Caravaggio => Preset::Caravaggio,
        PainterlyPreset::Rembrandt => Preset::Rembrandt,
    }
}

pub fn rotation_from_ipc(mode: IpcRotationMode) -> RotationMode {
    match mode {
        IpcRotationMode::Camera => RotationMode::Camera,
        IpcRotationMode::Object => RotationMode::Object,
    }
}

pub fn params_from_ipc(settings: &PainterlySettings) -> PainterlyParams {
    PainterlyParams {
        shadow_contrast: settings.shadow_contrast,
        light_intensity: settings.light_intensity,
        shadow_hardness: settings.shadow_hardness,
        scatter_amount: settings.scatter_amount,
        edge_softness: settings.edge_softness,
        sss_intensity: settings.sss_intensity,
        base_color: glam::Vec3::from_array(settings.base_color),
        light_color: glam::Vec3::from_array(settings.light_color),
    }
}

fn params_to_ipc(params: &PainterlyParams) -> PainterlySettings {
    PainterlySettings {
        shadow_contrast: params.shadow_contrast,
        light_intensity: params.light_intensity,
        shadow_hardness: params.shadow_hardness,
        scatter_amount: params.scatter_amount,
        edge_softness: params.edge_softness,
        sss_intensity: params.sss_intensity,
        base_color: params.base_color.to_array(),
        light_color: params.light_color.to_array(),
    }
}

pub fn state_from_snapshot(snapshot: &GallerySnapshot) -> GalleryState {
    GalleryState {
        active_configuration: snapshot.active_configuration.clone(),
        spot_only_mode: snapshot.spot_only_mode,
        user_intensity: snapshot.user_intensity,
        effects_enabled: snapshot.effects_enabled,
        material: match snapshot.material {
            MaterialChoice::Painterly => MaterialKind::Painterly,
            MaterialChoice::Standard => MaterialKind::Standard,
            MaterialChoice::Flat => MaterialKind::Flat,
        },
        rotation_mode: match snapshot.rotation_mode {
            RotationMode::Camera => IpcRotationMode::Camera,
            RotationMode::Object => IpcRotationMode::Object,
        },
        auto_rotate: snapshot.auto_rotate,
        show_helpers: snapshot.show_helpers,
        preset: snapshot.preset.map(preset_to_ipc),
        params: params_to_ipc(&snapshot.params),
        light_count: snapshot.light_count,
        painting_count: snapshot.painting_count,
    }
}

/// Pointer input from a UI overlay
pub fn pointer_from_mouse(event: MouseEvent) -> Option<PointerInput> {
    let button = |b: MouseButton| match b {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Secondary,
    };
    let input = match event {
        MouseEvent::Move { x, y, modifiers } => PointerInput::Move {
            position: glam::Vec2::new(x, y),
            shift: modifiers.shift,
        },
        MouseEvent::ButtonDown { button: b, x, y } => PointerInput::Down {
            position: glam::Vec2::new(x, y),
            button: button(b),
        },
        MouseEvent::ButtonUp { .. } => PointerInput::Up,
        MouseEvent::Leave => PointerInput::Leave,
        MouseEvent::Scroll { delta_y } if delta_y != 0.0 => PointerInput::Wheel { delta: delta_y },
        MouseEvent::Scroll { .. } => return None,
    };
    Some(input)
}

fn event_to_ipc(event: GalleryEvent) -> GalleryToUi {
    match event {
        GalleryEvent::StateChanged(snapshot) => GalleryToUi::StateChanged(state_from_snapshot(&snapshot)),
        GalleryEvent::AssetLoadFailed { painting, reason } => GalleryToUi::AssetLoadFailed { painting, reason },
        GalleryEvent::Warning(message) => GalleryToUi::Warning { message },
    }
}

fn apply_message(gallery: &mut Gallery, outbound: &mut OutboundUiMessages, msg: UiToGallery) {
    let g = &mut gallery.0;
    match msg {
        UiToGallery::Ready => {
            let configurations = g
                .configurations()
                .into_iter()
                .map(|(name, label)| ConfigurationInfo { name, label })
                .collect();
            outbound.send(GalleryToUi::ConfigurationList(configurations));
            outbound.send(GalleryToUi::StateChanged(state_from_snapshot(&g.snapshot())));
        }
        UiToGallery::SelectConfiguration { name } => {
            // Failures are queued as warnings by the gallery
            if g.select_configuration(&name).is_ok() {
                info!("Lighting configuration {}", name);
            }
        }
        UiToGallery::SetUserIntensity { value } => g.set_user_intensity(value),
        UiToGallery::SetSpotOnlyMode { enabled } => g.set_spot_only_mode(enabled),
        UiToGallery::SetEffectsEnabled { enabled } => g.set_effects_enabled(enabled),
        UiToGallery::SetRotationMode { mode } => g.set_rotation_mode(rotation_from_ipc(mode)),
        UiToGallery::SetAutoRotate { enabled } => g.set_auto_rotate(enabled),
        UiToGallery::SetShowHelpers { visible } => g.set_show_helpers(visible),
        UiToGallery::ApplyPreset { preset } => g.apply_preset(preset_from_ipc(preset)),
        UiToGallery::SetPainterlyParams(settings) => g.set_painterly_params(params_from_ipc(&settings)),
        UiToGallery::Recenter => g.recenter(),
        UiToGallery::FocusPainting { index } => {
            if !g.focus_painting(index) {
                outbound.send(GalleryToUi::Warning {
                    message: format!("No painting at index {index}"),
                });
            }
        }
        UiToGallery::Mouse(event) => {
            if let Some(input) = pointer_from_mouse(event) {
                g.pointer(input);
            }
        }
    }
}

/// Apply queued UI messages to the gallery
pub fn apply_ui_messages(
    mut inbound: ResMut<InboundUiMessages>,
    mut outbound: ResMut<OutboundUiMessages>,
    mut gallery: ResMut<Gallery>,
) {
    for msg in std::mem::take(&mut inbound.messages) {
        apply_message(&mut gallery, &mut outbound, msg);
    }
}

/// Forward gallery notifications to the UI queue
pub fn publish_gallery_events(mut gallery: ResMut<Gallery>, mut outbound: ResMut<OutboundUiMessages>) {
    for event in gallery.0.drain_events() {
        outbound.send(event_to_ipc(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfumato_config::GalleryConfig;

    fn gallery() -> Gallery {
        Gallery::new(&GalleryConfig::default())
    }

    #[test]
    fn test_ready_sends_catalog_and_state() {
        let mut g = gallery();
        let mut out = OutboundUiMessages::default();
        apply_message(&mut g, &mut out, UiToGallery::Ready);

        let messages = out.drain();
        assert_eq!(messages.len(), 2);
        let GalleryToUi::ConfigurationList(list) = &messages[0] else {
            panic!("expected configuration list, got {:?}", messages[0]);
        };
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"gallery-spots"));
        assert!(names.contains(&"atelier"));
        assert!(matches!(messages[1], GalleryToUi::StateChanged(_)));
    }

    #[test]
    fn test_commands_reach_the_gallery() {
        let mut g = gallery();
        let mut out = OutboundUiMessages::default();
        g.0.begin_gallery(2);

        apply_message(&mut g, &mut out, UiToGallery::SetSpotOnlyMode { enabled: true });
        apply_message(&mut g, &mut out, UiToGallery::ApplyPreset { preset: Preset::DaVinci });
        apply_message(&mut g, &mut out, UiToGallery::SetRotationMode { mode: IpcRotationMode::Object });

        let state = state_from_snapshot(&g.0.snapshot());
        assert!(state.spot_only_mode);
        assert_eq!(state.preset, Some(Preset::DaVinci));
        assert_eq!(state.rotation_mode, IpcRotationMode::Object);
    }

    #[test]
    fn test_unknown_configuration_becomes_warning() {
        let mut g = gallery();
        let mut out = OutboundUiMessages::default();
        g.0.drain_events();
        apply_message(&mut g, &mut out, UiToGallery::SelectConfiguration { name: "disco".into() });

        let events: Vec<GalleryToUi> = g.0.drain_events().into_iter().map(event_to_ipc).collect();
        assert!(matches!(events.as_slice(), [GalleryToUi::Warning { .. }]));
    }

    #[test]
    fn test_missing_painting_focus_warns() {
        let mut g = gallery();
        let mut out = OutboundUiMessages::default();
        apply_message(&mut g, &mut out, UiToGallery::FocusPainting { index: 3 });
        assert!(matches!(out.drain().as_slice(), [GalleryToUi::Warning { .. }]));
    }

    #[test]
    fn test_params_round_trip_through_wire_types() {
        let params = PainterlyPreset::Caravaggio.apply(&PainterlyParams::default());
        assert_eq!(params_from_ipc(&params_to_ipc(&params)), params);
    }

    #[test]
    fn test_pointer_from_mouse() {
        let down = pointer_from_mouse(MouseEvent::ButtonDown {
            button: MouseButton::Middle,
            x: 1.0,
            y: 2.0,
        });
        assert_eq!(
            down,
            Some(PointerInput::Down {
                position: glam::Vec2::new(1.0, 2.0),
                button: PointerButton::Middle
            })
        );
        assert_eq!(pointer_from_mouse(MouseEvent::Scroll { delta_y: 0.0 }), None);
    }
}
