use glam::{Vec2, Vec3};

/// Result of feeding one click to the [`LineTool`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineClick {
    /// First endpoint recorded; waiting for the second.
    Started(Vec3),
    /// Second endpoint recorded; the segment is ready to draw.
    Completed([Vec3; 2]),
}

/// Two-click line capture in NDC space.
///
/// Click count 0 records the start point, click count 1 records the end
/// point and marks the segment ready. Starting a new segment discards the
/// previous one entirely.
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    points: [Vec3; 2],
    clicks: u8,
    ready: bool,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press edge at `ndc`. Z is always 0.
    pub fn click(&mut self, ndc: Vec2) -> LineClick {
        let point = ndc.extend(0.0);
        if self.clicks == 0 {
            self.points = [point, Vec3::ZERO];
            self.ready = false;
            self.clicks = 1;
            tracing::debug!("line start at ({:.3}, {:.3})", ndc.x, ndc.y);
            LineClick::Started(point)
        } else {
            self.points[1] = point;
            self.ready = true;
            self.clicks = 0;
            tracing::debug!("line end at ({:.3}, {:.3})", ndc.x, ndc.y);
            LineClick::Completed(self.points)
        }
    }

    /// Number of endpoints captured toward the segment in progress (0 or 1).
    pub fn click_count(&self) -> u8 {
        self.clicks
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The completed segment, if both endpoints have been captured.
    pub fn segment(&self) -> Option<[Vec3; 2]> {
        self.ready.then_some(self.points)
    }

    /// Start point of a segment still waiting for its second click.
    pub fn pending_start(&self) -> Option<Vec3> {
        (self.clicks == 1).then_some(self.points[0])
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tool_has_nothing_to_draw() {
        let tool = LineTool::new();
        assert_eq!(tool.click_count(), 0);
        assert!(tool.segment().is_none());
        assert!(tool.pending_start().is_none());
    }

    #[test]
    fn two_clicks_make_a_segment() {
        let mut tool = LineTool::new();
        assert_eq!(
            tool.click(Vec2::new(-0.5, 0.5)),
            LineClick::Started(Vec3::new(-0.5, 0.5, 0.0))
        );
        assert_eq!(tool.click_count(), 1);
        assert!(!tool.is_ready());

        let done = tool.click(Vec2::new(0.25, -0.75));
        let expected = [Vec3::new(-0.5, 0.5, 0.0), Vec3::new(0.25, -0.75, 0.0)];
        assert_eq!(done, LineClick::Completed(expected));
        assert_eq!(tool.click_count(), 0);
        assert_eq!(tool.segment(), Some(expected));
    }

    #[test]
    fn third_click_starts_fresh() {
        let mut tool = LineTool::new();
        tool.click(Vec2::new(-1.0, -1.0));
        tool.click(Vec2::new(1.0, 1.0));
        tool.click(Vec2::new(0.1, 0.2));

        assert_eq!(tool.click_count(), 1);
        assert!(tool.segment().is_none());
        assert_eq!(tool.pending_start(), Some(Vec3::new(0.1, 0.2, 0.0)));

        let done = tool.click(Vec2::new(0.3, 0.4));
        assert_eq!(
            done,
            LineClick::Completed([Vec3::new(0.1, 0.2, 0.0), Vec3::new(0.3, 0.4, 0.0)])
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut tool = LineTool::new();
        tool.click(Vec2::ZERO);
        tool.click(Vec2::ONE);
        tool.clear();
        assert!(tool.segment().is_none());
        assert_eq!(tool.click_count(), 0);
    }
}
