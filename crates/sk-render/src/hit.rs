//! Hit testing: world point → region resize handle.
//!
//! The region exposes eight handles: four corner squares and the four edge
//! bands between them. Handle size is given in world units and grows as the
//! user zooms out, so handles keep a roughly constant on-screen size.

use sk_core::ViewportConfig;
use sk_core::model::{DrawingRegion, HandleDirection, Point};
use sk_core::transform::lerp_ranges;

/// Half-thickness of a handle zone in world units at the given scale.
///
/// Interpolates from `edge_touching_range` at `max_scale` up to
/// `edge_touching_range * extension_allowance_ratio` at `min_scale`.
pub fn handle_thickness(scale: f64, config: &ViewportConfig) -> f64 {
    lerp_ranges(
        scale,
        config.max_scale,
        config.min_scale,
        config.edge_touching_range,
        config.edge_touching_range * config.extension_allowance_ratio,
    )
}

/// Whether world point `p` lies inside the region, borders included.
pub fn region_contains(region: &DrawingRegion, p: Point) -> bool {
    region.contains(p)
}

/// Find the handle under world point `p`, if any.
///
/// Corners are tested before edges, so a point in a corner square always
/// resizes diagonally.
pub fn detect_handle(
    p: Point,
    region: &DrawingRegion,
    scale: f64,
    config: &ViewportConfig,
) -> Option<HandleDirection> {
    let h = handle_thickness(scale, config);
    let (left, top) = (region.left_top_x, region.left_top_y);
    let (right, bottom) = (region.right(), region.bottom());

    let near = |value: f64, line: f64| value >= line - h && value <= line + h;
    // Along an edge, excluding the corner squares at either end.
    let between = |value: f64, start: f64, end: f64| value >= start + h && value <= end - h;

    let corners = [
        (left, top, HandleDirection::TopLeft),
        (right, top, HandleDirection::TopRight),
        (left, bottom, HandleDirection::BottomLeft),
        (right, bottom, HandleDirection::BottomRight),
    ];
    for (cx, cy, direction) in corners {
        if near(p.x, cx) && near(p.y, cy) {
            return Some(direction);
        }
    }

    if near(p.y, top) && between(p.x, left, right) {
        Some(HandleDirection::Top)
    } else if near(p.y, bottom) && between(p.x, left, right) {
        Some(HandleDirection::Bottom)
    } else if near(p.x, left) && between(p.y, top, bottom) {
        Some(HandleDirection::Left)
    } else if near(p.x, right) && between(p.y, top, bottom) {
        Some(HandleDirection::Right)
    } else {
        None
    }
}
