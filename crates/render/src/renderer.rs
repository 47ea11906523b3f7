use crate::plan::{FillMode, FramePlan};

/// Renderer-agnostic interface.
///
/// A renderer reads a [`FramePlan`] and produces output. It never sees or
/// mutates the demo state itself.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Renders a plan as human-readable text, for the CLI and for tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} ({}x{}) ===\n",
            plan.frame, plan.viewport.width, plan.viewport.height
        ));
        let c = plan.clear_color;
        out.push_str(&format!(
            "clear: ({:.2}, {:.2}, {:.2}, {:.2})\n",
            c[0], c[1], c[2], c[3]
        ));

        match &plan.square {
            Some(square) => {
                let fill = match square.fill {
                    FillMode::Solid => "solid",
                    FillMode::Wireframe => "wireframe",
                };
                out.push_str(&format!(
                    "square: {fill}, {} vertices\n",
                    square.vertices().len()
                ));
            }
            None => out.push_str("square: hidden\n"),
        }

        match &plan.line {
            Some(line) => {
                let [a, b] = line.points;
                out.push_str(&format!(
                    "line: ({:.3}, {:.3}) -> ({:.3}, {:.3})\n",
                    a.x, a.y, b.x, b.y
                ));
            }
            None => out.push_str("line: none\n"),
        }

        out
    }
}
