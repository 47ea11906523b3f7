use serde::{Deserialize, Serialize};

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height yields the width as-is.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_square() {
        let vp = Viewport::default();
        assert_eq!(vp.width, 800);
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn aspect_of_widescreen() {
        let vp = Viewport::new(1280, 720);
        assert!((vp.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_is_empty() {
        assert!(Viewport::new(0, 600).is_empty());
        assert!(Viewport::new(600, 0).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
    }
}
