//! wgpu render backend for the flyline demos.
//!
//! Draws a [`FramePlan`](flyline_render::FramePlan): the square through the
//! camera transform, then the line directly in NDC.
//!
//! # Invariants
//! - Renderer never mutates demo state.
//! - Wireframe is drawn as a line list, so no optional device features are
//!   required.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
