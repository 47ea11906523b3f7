//! Demo simulation: the state one frame loop owns and mutates.
//!
//! # Invariants
//! - All mutable state lives in [`AppState`]; there are no globals.
//! - Pitch stays within [-89, 89] degrees.
//! - Jump velocity is zero whenever the body is grounded, and landing puts
//!   the body at exactly `y = 0`.
//! - A line segment is only reported once both endpoints are captured.

pub mod app;
pub mod camera;
pub mod config;
pub mod jump;
pub mod line_tool;
pub mod toggles;

pub use app::{AppState, AppSummary, FrameOutcome};
pub use camera::{CameraController, MoveIntent, PITCH_LIMIT};
pub use config::{
    CameraConfig, ConfigError, DemoConfig, DemoMode, Integrator, JumpConfig, WindowConfig,
};
pub use jump::{JumpPhase, JumpPhysics};
pub use line_tool::{LineClick, LineTool};
pub use toggles::RenderToggles;
