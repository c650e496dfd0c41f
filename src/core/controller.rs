/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Orbit left
    Left,
    /// Orbit right
    Right,
    /// Orbit up
    Up,
    /// Orbit down
    Down,
    /// Dolly in
    ZoomIn,
    /// Dolly out
    ZoomOut,
    Escape,
    MouseLeft,
    MouseRight,
}

/// Controller - input state sampled once per frame
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Pointer movement in pixels since the last reset
    fn pointer_delta(&self) -> (f32, f32) {
        (0.0, 0.0)
    }

    /// Scroll wheel movement in lines since the last reset, positive away from the user
    fn scroll_delta(&self) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }
    }

    #[test]
    fn test_button_hash() {
        let mut set = HashSet::new();
        set.insert(Button::Left);
        set.insert(Button::Left);
        set.insert(Button::MouseLeft);

        assert_eq!(set.len(), 2);
        assert!(set.contains(&Button::MouseLeft));
        assert!(!set.contains(&Button::ZoomIn));
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::MouseLeft, Button::ZoomIn],
        };

        assert!(controller.is_down(Button::MouseLeft));
        assert!(controller.is_down(Button::ZoomIn));
        assert!(!controller.is_down(Button::Left));
        assert_eq!(controller.get_down_keys().len(), 2);
    }

    #[test]
    fn test_default_deltas_are_zero() {
        let controller = MockController { pressed: vec![] };
        assert_eq!(controller.pointer_delta(), (0.0, 0.0));
        assert_eq!(controller.scroll_delta(), 0.0);
    }
}
