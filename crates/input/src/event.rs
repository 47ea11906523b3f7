use flyline_common::Viewport;
use serde::{Deserialize, Serialize};

/// Keys the demos react to. Everything else is dropped at the platform edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    P,
    C,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A single input event, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Key changed state. `pressed: true` may repeat while the key is held.
    Key { key: Key, pressed: bool },
    /// Mouse button changed state at the last known cursor position.
    Button { button: MouseButton, pressed: bool },
    /// Cursor position in pixels, top-left origin. While the cursor is
    /// captured this is a virtual position that keeps accumulating motion.
    CursorMoved { x: f64, y: f64 },
    /// Drawable area changed size.
    Resized(Viewport),
    /// Window lost keyboard focus.
    FocusLost,
}

impl InputEvent {
    pub fn key_down(key: Key) -> Self {
        Self::Key { key, pressed: true }
    }

    pub fn key_up(key: Key) -> Self {
        Self::Key {
            key,
            pressed: false,
        }
    }

    pub fn click(button: MouseButton) -> Self {
        Self::Button {
            button,
            pressed: true,
        }
    }

    pub fn release(button: MouseButton) -> Self {
        Self::Button {
            button,
            pressed: false,
        }
    }

    pub fn cursor(x: f64, y: f64) -> Self {
        Self::CursorMoved { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_expected_variants() {
        assert_eq!(
            InputEvent::key_down(Key::P),
            InputEvent::Key {
                key: Key::P,
                pressed: true
            }
        );
        assert!(matches!(
            InputEvent::release(MouseButton::Left),
            InputEvent::Button { pressed: false, .. }
        ));
    }

    #[test]
    fn yaml_uses_tagged_form() {
        let ev: InputEvent = serde_yaml::from_str("kind: key\nkey: space\npressed: true\n")
            .expect("parse key event");
        assert_eq!(ev, InputEvent::key_down(Key::Space));

        let ev: InputEvent =
            serde_yaml::from_str("kind: cursor_moved\nx: 10.5\ny: 20\n").expect("parse cursor");
        assert_eq!(ev, InputEvent::cursor(10.5, 20.0));
    }
}
