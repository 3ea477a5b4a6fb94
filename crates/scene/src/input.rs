//! Window mouse input forwarded to the gallery as pointer events.

use bevy::input::ButtonState;
use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved};
use lighting::{PointerButton, PointerInput};

use crate::engine::Gallery;

/// Pixels per wheel line, matching a browser's deltaY per notch
const PIXELS_PER_LINE: f32 = 100.0;

/// Last cursor position in logical pixels
#[derive(Resource, Debug, Default)]
pub struct PointerState {
    pub position: Vec2,
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Wheel delta in pixels, positive away from the scene
pub fn wheel_delta(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * PIXELS_PER_LINE,
        MouseScrollUnit::Pixel => -y,
    }
}

fn glam_vec2(v: Vec2) -> glam::Vec2 {
    glam::Vec2::from_array(v.to_array())
}

/// Translate this frame's mouse messages into gallery pointer input
pub fn forward_pointer_input(
    mut cursor_moved: MessageReader<CursorMoved>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut buttons: MessageReader<MouseButtonInput>,
    mut wheel: MessageReader<MouseWheel>,
    keys: Res<ButtonInput<KeyCode>>,
    mut pointer: ResMut<PointerState>,
    mut gallery: ResMut<Gallery>,
) {
    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);

    for event in buttons.read() {
        let Some(button) = pointer_button(event.button) else {
            continue;
        };
        let input = match event.state {
            ButtonState::Pressed => PointerInput::Down {
                position: glam_vec2(pointer.position),
                button,
            },
            ButtonState::Released => PointerInput::Up,
        };
        gallery.0.pointer(input);
    }

    // Only the latest position matters within a frame
    if let Some(event) = cursor_moved.read().last() {
        pointer.position = event.position;
        gallery.0.pointer(PointerInput::Move {
            position: glam_vec2(event.position),
            shift,
        });
    }

    if cursor_left.read().count() > 0 {
        gallery.0.pointer(PointerInput::Leave);
    }

    let delta: f32 = wheel.read().map(|w| wheel_delta(w.unit, w.y)).sum();
    if delta != 0.0 {
        gallery.0.pointer(PointerInput::Wheel { delta });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Middle), Some(PointerButton::Middle));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }

    #[test]
    fn test_wheel_up_zooms_in() {
        assert_eq!(wheel_delta(MouseScrollUnit::Line, 1.0), -100.0);
        assert_eq!(wheel_delta(MouseScrollUnit::Pixel, -12.0), 12.0);
    }
}
