/// User-facing render switches. Each reflects the latest key edge or GUI
/// checkbox change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderToggles {
    pub wireframe: bool,
    pub draw_square: bool,
    pub mouse_captured: bool,
}

impl Default for RenderToggles {
    fn default() -> Self {
        Self {
            wireframe: false,
            draw_square: true,
            mouse_captured: false,
        }
    }
}

impl RenderToggles {
    pub fn toggle_wireframe(&mut self) -> bool {
        self.wireframe = !self.wireframe;
        tracing::debug!("wireframe {}", on_off(self.wireframe));
        self.wireframe
    }

    /// Enter capture mode. Returns false if already captured.
    pub fn capture(&mut self) -> bool {
        if self.mouse_captured {
            return false;
        }
        self.mouse_captured = true;
        tracing::debug!("mouse captured");
        true
    }

    /// Leave capture mode. Returns false if not captured.
    pub fn release(&mut self) -> bool {
        if !self.mouse_captured {
            return false;
        }
        self.mouse_captured = false;
        tracing::debug!("mouse released");
        true
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}
