//! Input: platform events mapped to a small shared vocabulary.
//!
//! The desktop window and the headless CLI both produce [`InputEvent`]s and
//! hand them to an [`InputSink`]. Neither the simulation nor the renderer ever
//! sees a winit type.
//!
//! # Invariants
//! - A key or button "press" is reported once per physical press. OS key
//!   repeat does not produce new press edges.
//! - Losing focus releases everything that was held.

pub mod event;
pub mod script;
pub mod sink;
pub mod state;

pub use event::{InputEvent, Key, MouseButton};
pub use script::{InputScript, ScriptError, ScriptFrame};
pub use sink::InputSink;
pub use state::{InputFrame, InputState};
