use flyline_common::{Viewport, screen_to_ndc};
use flyline_input::{InputEvent, InputFrame, InputSink, InputState, Key, MouseButton};
use glam::Vec3;
use serde::Serialize;

use crate::camera::{CameraController, MoveIntent};
use crate::config::{DemoConfig, DemoMode};
use crate::jump::{JumpPhase, JumpPhysics};
use crate::line_tool::{LineClick, LineTool};
use crate::toggles::RenderToggles;

/// What happened during one [`AppState::update`], for the host to react to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    /// `Some(true)` when capture mode began this frame, `Some(false)` when it ended.
    pub capture_changed: Option<bool>,
    pub wireframe_toggled: bool,
    pub line: Option<LineClick>,
    pub jumped: bool,
    pub landed: bool,
}

/// All mutable demo state, owned by the frame loop.
///
/// Input arrives through [`InputSink`] between frames and is consumed by
/// [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: DemoMode,
    pub camera: CameraController,
    pub jump: JumpPhysics,
    pub line: LineTool,
    pub toggles: RenderToggles,
    viewport: Viewport,
    input: InputState,
    pending: InputFrame,
    frame_index: u64,
    elapsed: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DemoConfig::default())
    }
}

impl InputSink for AppState {
    fn push_event(&mut self, event: InputEvent) {
        self.input.apply(&mut self.pending, event);
    }
}

impl AppState {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            mode: config.mode,
            camera: CameraController::from_config(&config.camera),
            jump: JumpPhysics::new(config.jump.clone()),
            line: LineTool::new(),
            toggles: RenderToggles::default(),
            viewport: Viewport::new(config.window.width, config.window.height),
            input: InputState::new(),
            pending: InputFrame::default(),
            frame_index: 0,
            elapsed: 0.0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn square_visible(&self) -> bool {
        self.mode.has_square() && self.toggles.draw_square
    }

    /// Consume queued input and advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> FrameOutcome {
        let frame = std::mem::take(&mut self.pending);
        let mut out = FrameOutcome::default();

        if let Some(viewport) = frame.resized {
            self.viewport = viewport;
        }

        for _ in 0..frame.key_presses(Key::P) {
            self.toggles.toggle_wireframe();
            out.wireframe_toggled = true;
        }
        if self.mode.has_line_tool() && frame.key_pressed(Key::C) {
            self.line.clear();
        }

        for press in frame
            .buttons_pressed
            .iter()
            .filter(|p| p.button == MouseButton::Left)
        {
            if self.mode.has_line_tool() && !self.viewport.is_empty() {
                if let Some((x, y)) = press.position {
                    let ndc = screen_to_ndc(x, y, self.viewport);
                    out.line = Some(self.line.click(ndc));
                }
            }
            if self.mode.has_camera() && self.toggles.capture() {
                self.camera.begin_capture();
                out.capture_changed = Some(true);
            }
        }

        if frame.key_pressed(Key::Escape) && self.toggles.release() {
            out.capture_changed = Some(false);
        }

        if self.mode.has_camera() {
            // Samples from the frame capture began in predate the grab.
            if self.toggles.mouse_captured && out.capture_changed != Some(true) {
                for &(x, y) in &frame.cursor_samples {
                    self.camera.look(x, y);
                }
            }

            self.camera.walk(MoveIntent::from_input(&self.input), dt);

            if self.input.key_down(Key::Space) {
                out.jumped = self.jump.try_jump(self.camera.position.y);
            }
            out.landed = self.jump.step(&mut self.camera.position.y, dt) == JumpPhase::Landed;
        }

        self.frame_index += 1;
        self.elapsed += dt as f64;
        out
    }

    pub fn summary(&self) -> AppSummary {
        AppSummary {
            frame: self.frame_index,
            mode: self.mode,
            position: self.camera.position,
            yaw: self.camera.yaw(),
            pitch: self.camera.pitch(),
            airborne: self.jump.is_airborne(),
            captured: self.toggles.mouse_captured,
            wireframe: self.toggles.wireframe,
            line_clicks: self.line.click_count(),
            line_ready: self.line.is_ready(),
        }
    }
}

/// Read-only snapshot for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppSummary {
    pub frame: u64,
    pub mode: DemoMode,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub airborne: bool,
    pub captured: bool,
    pub wireframe: bool,
    pub line_clicks: u8,
    pub line_ready: bool,
}

impl std::fmt::Display for AppSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} mode={} pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} airborne={} captured={} wireframe={} line_clicks={} line_ready={}",
            self.frame,
            self.mode,
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch,
            self.airborne,
            self.captured,
            self.wireframe,
            self.line_clicks,
            self.line_ready
        )
    }
}
