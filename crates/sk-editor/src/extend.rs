//! Region resize ("extend") geometry.
//!
//! Both functions are pure: they take the region captured at pointer-down
//! and the world-space drag delta since then, and return the new region.
//! Dragging a top/left handle moves the origin so the opposite edge stays
//! put; sizes never drop below `min_size`, again with the opposite edge
//! fixed.

use sk_core::model::{DrawingRegion, HandleDirection, Point};

/// Resize by dragging one edge.
pub fn extend_sideways(
    captured: &DrawingRegion,
    direction: HandleDirection,
    delta: Point,
    min_size: f64,
) -> DrawingRegion {
    let mut region = *captured;
    match direction {
        HandleDirection::Right => {
            region.width = (captured.width + delta.x).max(min_size);
        }
        HandleDirection::Bottom => {
            region.height = (captured.height + delta.y).max(min_size);
        }
        HandleDirection::Left => {
            region.width = (captured.width - delta.x).max(min_size);
            region.left_top_x = captured.right() - region.width;
        }
        HandleDirection::Top => {
            region.height = (captured.height - delta.y).max(min_size);
            region.left_top_y = captured.bottom() - region.height;
        }
        corner => {
            log::trace!("extend_sideways called with corner {corner:?}");
            return extend_diagonally(captured, corner, delta, min_size);
        }
    }
    region
}

/// Resize by dragging a corner: the vertical and horizontal edges of the
/// corner are applied one after the other.
pub fn extend_diagonally(
    captured: &DrawingRegion,
    direction: HandleDirection,
    delta: Point,
    min_size: f64,
) -> DrawingRegion {
    let Some((vertical, horizontal)) = direction.split_corner() else {
        return extend_sideways(captured, direction, delta, min_size);
    };
    let region = extend_sideways(captured, vertical, delta, min_size);
    extend_sideways(&region, horizontal, delta, min_size)
}

/// Dispatch on the handle kind.
pub fn extend(
    captured: &DrawingRegion,
    direction: HandleDirection,
    delta: Point,
    min_size: f64,
) -> DrawingRegion {
    if direction.is_corner() {
        extend_diagonally(captured, direction, delta, min_size)
    } else {
        extend_sideways(captured, direction, delta, min_size)
    }
}
