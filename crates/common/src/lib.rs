//! Shared types for the flyline demos: viewport size and coordinate mapping.
//!
//! # Invariants
//! - Pixel origin is the top-left corner of the viewport, Y grows downward.
//! - NDC origin is the viewport centre, Y grows upward.

pub mod coords;
pub mod types;

pub use coords::{ndc_to_screen, screen_to_ndc};
pub use types::Viewport;
