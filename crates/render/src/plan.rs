use flyline_common::Viewport;
use flyline_sim::AppState;
use glam::{Mat4, Vec3};
use serde::Serialize;

/// Background colour.
pub const CLEAR_COLOR: [f32; 4] = [0.07, 0.13, 0.17, 1.0];

/// Colour of the square and the line.
pub const GEOMETRY_COLOR: [f32; 4] = [0.8, 0.3, 0.02, 1.0];

/// The static square on the `z = 0` plane, as two triangles.
#[rustfmt::skip]
pub const SQUARE_VERTICES: [Vec3; 6] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new( 1.0, -1.0, 0.0),
    Vec3::new( 1.0,  1.0, 0.0),

    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new( 1.0,  1.0, 0.0),
    Vec3::new(-1.0,  1.0, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    Solid,
    Wireframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SquareDraw {
    pub fill: FillMode,
    pub color: [f32; 4],
}

impl SquareDraw {
    /// Vertices to submit for this fill mode: a triangle list when solid,
    /// the edges of both triangles as a line list when wireframe.
    pub fn vertices(&self) -> Vec<Vec3> {
        match self.fill {
            FillMode::Solid => SQUARE_VERTICES.to_vec(),
            FillMode::Wireframe => SQUARE_VERTICES
                .chunks_exact(3)
                .flat_map(|t| [t[0], t[1], t[1], t[2], t[2], t[0]])
                .collect(),
        }
    }
}

/// A line segment in NDC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineDraw {
    pub points: [Vec3; 2],
    pub color: [f32; 4],
}

/// Everything one frame draws, in order: clear, square, line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePlan {
    pub frame: u64,
    pub viewport: Viewport,
    pub clear_color: [f32; 4],
    pub view_proj: Mat4,
    pub square: Option<SquareDraw>,
    pub line: Option<LineDraw>,
}

impl FramePlan {
    pub fn build(state: &AppState) -> Self {
        let viewport = state.viewport();
        let square = state.square_visible().then(|| SquareDraw {
            fill: if state.toggles.wireframe {
                FillMode::Wireframe
            } else {
                FillMode::Solid
            },
            color: GEOMETRY_COLOR,
        });
        let line = state.line.segment().map(|points| LineDraw {
            points,
            color: GEOMETRY_COLOR,
        });

        Self {
            frame: state.frame_index(),
            viewport,
            clear_color: CLEAR_COLOR,
            view_proj: state.camera.view_projection(viewport.aspect()),
            square,
            line,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.square.is_none() && self.line.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyline_input::{InputEvent, InputSink, Key, MouseButton};
    use flyline_sim::{DemoConfig, DemoMode};

    fn app(mode: DemoMode) -> AppState {
        AppState::new(&DemoConfig {
            mode,
            ..DemoConfig::default()
        })
    }

    fn click_at(app: &mut AppState, x: f64, y: f64) {
        app.push_events([
            InputEvent::cursor(x, y),
            InputEvent::click(MouseButton::Left),
            InputEvent::release(MouseButton::Left),
        ]);
        app.update(1.0 / 60.0);
    }

    #[test]
    fn default_frame_draws_solid_square_only() {
        let plan = FramePlan::build(&AppState::default());
        assert_eq!(plan.clear_color, CLEAR_COLOR);
        assert_eq!(
            plan.square.map(|s| s.fill),
            Some(FillMode::Solid)
        );
        assert!(plan.line.is_none());
    }

    #[test]
    fn hidden_square_is_not_drawn() {
        let mut state = AppState::default();
        state.toggles.draw_square = false;
        assert!(FramePlan::build(&state).square.is_none());
    }

    #[test]
    fn wireframe_switches_fill_mode() {
        let mut state = AppState::default();
        state.push_event(InputEvent::key_down(Key::P));
        state.update(1.0 / 60.0);
        let plan = FramePlan::build(&state);
        assert_eq!(plan.square.map(|s| s.fill), Some(FillMode::Wireframe));
    }

    #[test]
    fn line_only_after_second_click() {
        let mut state = app(DemoMode::Sketch);
        click_at(&mut state, 0.0, 0.0);
        assert!(FramePlan::build(&state).line.is_none());

        click_at(&mut state, 800.0, 800.0);
        let plan = FramePlan::build(&state);
        let line = plan.line.expect("line is ready");
        assert_eq!(
            line.points,
            [Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0)]
        );

        // A third click starts over and hides the old segment.
        click_at(&mut state, 400.0, 400.0);
        assert!(FramePlan::build(&state).line.is_none());
    }

    #[test]
    fn sketch_mode_has_no_square() {
        let plan = FramePlan::build(&app(DemoMode::Sketch));
        assert!(plan.square.is_none());
        assert!(plan.is_empty());
    }

    #[test]
    fn wireframe_vertices_trace_triangle_edges() {
        let solid = SquareDraw {
            fill: FillMode::Solid,
            color: GEOMETRY_COLOR,
        };
        let wire = SquareDraw {
            fill: FillMode::Wireframe,
            ..solid
        };
        assert_eq!(solid.vertices().len(), 6);
        let edges = wire.vertices();
        assert_eq!(edges.len(), 12);
        assert_eq!(edges[0], SQUARE_VERTICES[0]);
        assert_eq!(edges[5], SQUARE_VERTICES[0]);
    }

    #[test]
    fn square_centre_projects_ahead_of_default_camera() {
        let plan = FramePlan::build(&AppState::default());
        let clip = plan.view_proj * Vec3::ZERO.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
