use crate::types::Viewport;
use glam::Vec2;

/// Convert a pixel position to normalized device coordinates.
///
/// `ndc.x = 2x / width - 1`, `ndc.y = 1 - 2y / height`. The viewport must be
/// non-empty.
pub fn screen_to_ndc(x: f64, y: f64, viewport: Viewport) -> Vec2 {
    debug_assert!(!viewport.is_empty(), "viewport must be non-empty");
    let w = viewport.width as f64;
    let h = viewport.height as f64;
    Vec2::new((2.0 * x / w - 1.0) as f32, (1.0 - 2.0 * y / h) as f32)
}

/// Inverse of [`screen_to_ndc`].
pub fn ndc_to_screen(ndc: Vec2, viewport: Viewport) -> (f64, f64) {
    let w = viewport.width as f64;
    let h = viewport.height as f64;
    let x = (ndc.x as f64 + 1.0) * w / 2.0;
    let y = (1.0 - ndc.y as f64) * h / 2.0;
    (x, y)
}
