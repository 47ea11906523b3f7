use std::collections::HashSet;

use flyline_common::Viewport;

use crate::event::{InputEvent, Key, MouseButton};

/// Per-frame input transitions.
///
/// [`InputState`] answers "is it held right now"; `InputFrame` answers "what
/// changed since the last frame". Clear it once the frame has consumed it.
#[derive(Debug, Default, Clone)]
pub struct InputFrame {
    /// Press edges in arrival order. A key tapped twice in one frame
    /// appears twice.
    pub keys_pressed: Vec<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: Vec<ButtonPress>,
    pub buttons_released: HashSet<MouseButton>,
    /// Cursor samples in arrival order.
    pub cursor_samples: Vec<(f64, f64)>,
    /// Latest viewport size reported this frame, if any.
    pub resized: Option<Viewport>,
}

/// A button press edge and where the cursor was when it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonPress {
    pub button: MouseButton,
    pub position: Option<(f64, f64)>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.cursor_samples.clear();
        self.resized = None;
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Number of press edges `key` produced this frame.
    pub fn key_presses(&self, key: Key) -> usize {
        self.keys_pressed.iter().filter(|&&k| k == key).count()
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.iter().any(|p| p.button == button)
    }

    pub fn is_empty(&self) -> bool {
        self.keys_pressed.is_empty()
            && self.keys_released.is_empty()
            && self.buttons_pressed.is_empty()
            && self.buttons_released.is_empty()
            && self.cursor_samples.is_empty()
            && self.resized.is_none()
    }
}

/// Held keys and buttons plus the last known cursor position.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
    cursor: Option<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event, recording any edge it produces into `frame`.
    pub fn apply(&mut self, frame: &mut InputFrame, event: InputEvent) {
        match event {
            InputEvent::Key { key, pressed: true } => {
                // Repeat presses of a held key are not edges.
                if self.keys_down.insert(key) {
                    frame.keys_pressed.push(key);
                }
            }
            InputEvent::Key {
                key,
                pressed: false,
            } => {
                if self.keys_down.remove(&key) {
                    frame.keys_released.insert(key);
                }
            }
            InputEvent::Button {
                button,
                pressed: true,
            } => {
                if self.buttons_down.insert(button) {
                    frame.buttons_pressed.push(ButtonPress {
                        button,
                        position: self.cursor,
                    });
                }
            }
            InputEvent::Button {
                button,
                pressed: false,
            } => {
                if self.buttons_down.remove(&button) {
                    frame.buttons_released.insert(button);
                }
            }
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Some((x, y));
                frame.cursor_samples.push((x, y));
            }
            InputEvent::Resized(viewport) => {
                frame.resized = Some(viewport);
            }
            InputEvent::FocusLost => {
                if !self.keys_down.is_empty() || !self.buttons_down.is_empty() {
                    tracing::debug!("focus lost, releasing held input");
                }
                frame.keys_released.extend(self.keys_down.drain());
                frame.buttons_released.extend(self.buttons_down.drain());
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}
