//! World ↔ screen coordinate transform and pan/zoom limits.
//!
//! The forward mapping is
//!
//! ```text
//! screen = (world + viewport_center) * scale + offset
//! ```
//!
//! so the world origin sits at the surface center when `offset` is zero and
//! `scale` is one. All functions here are pure; the controller owns the
//! state and calls them after every mutation.

use crate::config::ViewportConfig;
use crate::model::{DrawingRegion, PanZoom, Point, Viewport};

pub fn world_to_screen(world: Point, pan_zoom: &PanZoom, viewport: Viewport) -> Point {
    (world + viewport.center()) * pan_zoom.scale + pan_zoom.offset
}

pub fn screen_to_world(screen: Point, pan_zoom: &PanZoom, viewport: Viewport) -> Point {
    (screen - pan_zoom.offset) * (1.0 / pan_zoom.scale) - viewport.center()
}

/// Clamp a scale candidate into the configured zoom range.
pub fn clamp_scale(candidate: f64, config: &ViewportConfig) -> f64 {
    if candidate.is_nan() {
        return config.min_scale;
    }
    candidate.max(config.min_scale).min(config.max_scale)
}

/// Allowed offset range along one axis.
///
/// `extent` is the region's width (or height), `origin` its left (or top)
/// world coordinate and `view` the viewport width (or height).
fn offset_bounds(extent: f64, origin: f64, view: f64, scale: f64) -> (f64, f64) {
    let scaled_extent = extent * scale;
    let scaled_origin = origin * scale;
    let scaled_center = view / 2.0 * scale;
    if scaled_extent > view {
        (
            -scaled_extent - scaled_center - scaled_origin,
            view - scaled_center - scaled_origin,
        )
    } else {
        (
            -scaled_origin - scaled_center,
            -scaled_origin + view - scaled_extent - scaled_center,
        )
    }
}

/// Correct a candidate offset so the region can never be panned entirely
/// out of view. Idempotent.
pub fn clamp_offset(
    candidate: Point,
    pan_zoom: &PanZoom,
    region: &DrawingRegion,
    viewport: Viewport,
) -> Point {
    let (min_x, max_x) =
        offset_bounds(region.width, region.left_top_x, viewport.width, pan_zoom.scale);
    let (min_y, max_y) =
        offset_bounds(region.height, region.left_top_y, viewport.height, pan_zoom.scale);
    // Lower bound first, then upper: if the bounds ever cross the upper wins.
    Point::new(
        candidate.x.max(min_x).min(max_x),
        candidate.y.max(min_y).min(max_y),
    )
}

/// Offset that keeps the world point under `anchor` (screen) fixed when the
/// scale changes from `pan_zoom.scale` to `new_scale`.
pub fn zoom_about(anchor: Point, pan_zoom: &PanZoom, new_scale: f64) -> Point {
    anchor - (anchor - pan_zoom.offset) * (new_scale / pan_zoom.scale)
}

/// Offset that puts the region's center at the viewport center.
pub fn centered_offset(region: &DrawingRegion, scale: f64, viewport: Viewport) -> Point {
    let center = viewport.center();
    center - (region.center() + center) * scale
}

/// Map `value` from the range `[from_a, from_b]` onto `[to_a, to_b]`.
/// Either range may be inverted; values outside extrapolate linearly.
pub fn lerp_ranges(value: f64, from_a: f64, from_b: f64, to_a: f64, to_b: f64) -> f64 {
    if from_a == from_b {
        return to_a;
    }
    let t = (value - from_a) / (from_b - from_a);
    to_a + t * (to_b - to_a)
}
