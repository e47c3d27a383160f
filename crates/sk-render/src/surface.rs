//! Drawing-surface abstraction.
//!
//! The renderer only needs a handful of primitives; each backend (CPU
//! raster, Vello scene, browser Canvas2D) implements them in its own terms.
//! All coordinates are device pixels.

use sk_core::model::Point;

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A 2D target the renderer can draw into.
pub trait Surface {
    /// Size of the surface in device pixels.
    fn size(&self) -> (f64, f64);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Fill a rectangle with a CSS color string.
    fn fill_rect(&mut self, rect: ScreenRect, color: &str);

    /// Restrict subsequent drawing to `rect` (intersected with any
    /// clip already active) until the matching [`Surface::pop_clip`].
    fn push_clip_rect(&mut self, rect: ScreenRect);

    fn pop_clip(&mut self);

    /// Stroke an open polyline with round caps and joins. A single point
    /// draws a dot of diameter `width`.
    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: &str);
}
