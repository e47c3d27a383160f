//! Viewport state → surface drawing commands.
//!
//! Draw order for one frame:
//! 1. clear, then fill the whole surface with the neutral background;
//! 2. clip to the region's screen rectangle and fill it with the region color;
//! 3. stroke every committed stroke in list order, then the in-progress one.
//!
//! Later strokes draw over earlier ones; there is no other z-order.

use crate::surface::{ScreenRect, Surface};
use sk_core::model::{DrawingRegion, PanZoom, Point, Stroke, Viewport};
use sk_core::transform::world_to_screen;

/// Theme-dependent colors for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTheme {
    /// Outside the drawing region.
    pub background: &'static str,
    /// Inside the drawing region, and behind exported images.
    pub region_fill: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            background: "#999999",
            region_fill: "#FFFFFF",
        }
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub strokes: &'a [Stroke],
    /// Stroke still being drawn, not yet in `strokes`.
    pub pending: Option<&'a Stroke>,
    pub region: &'a DrawingRegion,
    pub pan_zoom: &'a PanZoom,
    pub viewport: Viewport,
    pub dpr: f64,
}

impl Frame<'_> {
    fn to_device(&self, world: Point) -> Point {
        world_to_screen(world, self.pan_zoom, self.viewport) * self.dpr
    }

    /// The region's rectangle in device pixels.
    pub fn region_rect(&self) -> ScreenRect {
        let lt = self.to_device(self.region.left_top());
        let factor = self.pan_zoom.scale * self.dpr;
        ScreenRect::new(
            lt.x,
            lt.y,
            self.region.width * factor,
            self.region.height * factor,
        )
    }
}

/// Paint a full viewport frame.
pub fn render_frame<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>, theme: &CanvasTheme) {
    let (width, height) = surface.size();
    surface.clear();
    surface.fill_rect(ScreenRect::new(0.0, 0.0, width, height), theme.background);

    let region_rect = frame.region_rect();
    surface.push_clip_rect(region_rect);
    surface.fill_rect(region_rect, theme.region_fill);

    let width_factor = frame.pan_zoom.scale * frame.dpr;
    for stroke in frame.strokes.iter().chain(frame.pending) {
        paint_stroke(surface, stroke, width_factor, |p| frame.to_device(p));
    }

    surface.pop_clip();
}

/// Paint only the drawing region, stretched to cover the whole surface.
///
/// Used for raster export: the output has the surface's fixed size no
/// matter how large the region is or where the viewport currently looks.
pub fn render_region<S: Surface + ?Sized>(
    surface: &mut S,
    strokes: &[Stroke],
    region: &DrawingRegion,
    theme: &CanvasTheme,
) {
    let (width, height) = surface.size();
    let full = ScreenRect::new(0.0, 0.0, width, height);
    surface.clear();
    surface.push_clip_rect(full);
    surface.fill_rect(full, theme.region_fill);

    if region.width > 0.0 && region.height > 0.0 {
        let sx = width / region.width;
        let sy = height / region.height;
        let origin = region.left_top();
        for stroke in strokes {
            paint_stroke(surface, stroke, (sx + sy) / 2.0, |p| {
                Point::new((p.x - origin.x) * sx, (p.y - origin.y) * sy)
            });
        }
    } else {
        log::debug!("skipping strokes for degenerate region {region:?}");
    }

    surface.pop_clip();
}

fn paint_stroke<S, F>(surface: &mut S, stroke: &Stroke, width_factor: f64, map: F)
where
    S: Surface + ?Sized,
    F: Fn(Point) -> Point,
{
    if stroke.points.is_empty() {
        return;
    }
    let points: Vec<Point> = stroke.points.iter().map(|&p| map(p)).collect();
    surface.stroke_polyline(&points, stroke.stroke_width * width_factor, &stroke.color);
}
