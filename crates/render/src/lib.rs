//! Rendering adapter: what a frame draws, independent of any GPU API.
//!
//! # Invariants
//! - Renderers never mutate demo state.
//! - The line appears in a plan only when the line tool holds a complete
//!   segment.
//! - Line endpoints are already in NDC and bypass the camera transform.

mod plan;
mod renderer;

pub use plan::{
    CLEAR_COLOR, FillMode, FramePlan, GEOMETRY_COLOR, LineDraw, SQUARE_VERTICES, SquareDraw,
};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "flyline-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
