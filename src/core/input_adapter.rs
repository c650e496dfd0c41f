use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixels of a touchpad scroll that count as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Wheel movement since last reset
    scroll: f32,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_state(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = Self::mouse_button_to_button(*button) {
                    self.set_state(button, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if let Some(old_pos) = self.mouse_position {
                    self.mouse_delta.0 += new_pos.0 - old_pos.0;
                    self.mouse_delta.1 += new_pos.1 - old_pos.1;
                }
                self.mouse_position = Some(new_pos);
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }
            _ => {}
        }
    }

    /// Process an event the UI overlay already consumed
    ///
    /// Only releases get through, so a drag or key press that began in the
    /// scene still ends when it is let go over the panel.
    pub fn process_consumed_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => self.release(Self::mouse_button_to_button(*button)),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Released => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    self.release(Self::keycode_to_button(keycode));
                }
            }
            _ => {}
        }
    }

    fn release(&mut self, button: Option<Button>) {
        if let Some(button) = button {
            self.set_state(button, ElementState::Released);
        }
    }

    fn set_state(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
        }
    }

    /// Reset per-frame state (mouse and wheel deltas)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll = 0.0;
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Button::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Button::Right),
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Button::Up),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Button::Down),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Button::ZoomIn),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Button::ZoomOut),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            // SAFETY: the id is never handed back to winit
            device_id: unsafe { winit::event::DeviceId::dummy() },
            state,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::MouseLeft));
        assert_eq!(controller.get_down_keys().len(), 0);
        assert_eq!(controller.mouse_position(), None);
        assert_eq!(controller.pointer_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_press_and_release() {
        let mut controller = WinitController::new();
        controller.set_state(Button::MouseLeft, ElementState::Pressed);
        controller.set_state(Button::MouseLeft, ElementState::Pressed);
        assert_eq!(controller.get_down_keys(), &[Button::MouseLeft]);

        controller.set_state(Button::MouseLeft, ElementState::Released);
        assert!(!controller.is_down(Button::MouseLeft));
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_release_over_panel_ends_drag() {
        let mut controller = WinitController::new();
        controller.process_event(&mouse(ElementState::Pressed));
        assert!(controller.is_down(Button::MouseLeft));

        controller.process_consumed_event(&mouse(ElementState::Released));
        assert!(!controller.is_down(Button::MouseLeft));
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_press_over_panel_is_ignored() {
        let mut controller = WinitController::new();
        controller.process_consumed_event(&mouse(ElementState::Pressed));
        assert!(!controller.is_down(Button::MouseLeft));
    }

    #[test]
    fn test_delta_reset() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (10.0, 5.0);
        controller.scroll = 2.0;
        controller.mouse_position = Some((100.0, 200.0));

        controller.reset_deltas();
        assert_eq!(controller.pointer_delta(), (0.0, 0.0));
        assert_eq!(controller.scroll_delta(), 0.0);
        assert_eq!(controller.mouse_position(), Some((100.0, 200.0)));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(WinitController::keycode_to_button(KeyCode::ArrowLeft), Some(Button::Left));
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyW), Some(Button::Up));
        assert_eq!(WinitController::keycode_to_button(KeyCode::Minus), Some(Button::ZoomOut));
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyQ), None);
    }
}
