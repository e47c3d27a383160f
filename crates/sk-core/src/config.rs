//! Viewport tuning knobs.
//!
//! Hosts pass a (possibly partial) JSON object; every missing field falls
//! back to the defaults below.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 200.0;
pub const DEFAULT_MAX_SCALE: f64 = 1.5;
pub const DEFAULT_MIN_SCALE: f64 = 0.3;
/// Handle thickness at max zoom, in world units.
pub const INTERACTION_EDGE_TOUCHING_RANGE: f64 = 6.0;
/// How much thicker handles get (in world units) at min zoom.
pub const INTERACTION_EXTENSION_ALLOWANCE_RATIO: f64 = 2.0;
pub const DEFAULT_REGION_WIDTH: f64 = 150.0;
pub const DEFAULT_REGION_HEIGHT: f64 = 150.0;
pub const DEFAULT_HISTORY_DEPTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Larger values make wheel and pinch zoom slower.
    pub zoom_sensitivity: f64,
    pub edge_touching_range: f64,
    pub extension_allowance_ratio: f64,
    /// Smallest width/height a resize gesture may leave the region with.
    pub min_region_size: f64,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Color painted by the eraser tool.
    pub eraser_color: String,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            edge_touching_range: INTERACTION_EDGE_TOUCHING_RANGE,
            extension_allowance_ratio: INTERACTION_EXTENSION_ALLOWANCE_RATIO,
            min_region_size: 1.0,
            history_depth: DEFAULT_HISTORY_DEPTH,
            eraser_color: "#FFFFFF".to_string(),
        }
    }
}

impl ViewportConfig {
    /// Repair values a host could plausibly get wrong: swapped scale
    /// limits, non-positive sensitivity, negative sizes.
    pub fn sanitized(mut self) -> Self {
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        if !(self.min_scale > 0.0) {
            log::warn!("min_scale {} is not positive, using default", self.min_scale);
            self.min_scale = DEFAULT_MIN_SCALE.min(self.max_scale);
        }
        if !(self.zoom_sensitivity > 0.0) {
            self.zoom_sensitivity = DEFAULT_ZOOM_SENSITIVITY;
        }
        self.min_region_size = self.min_region_size.max(0.0);
        self.edge_touching_range = self.edge_touching_range.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ViewportConfig = serde_json::from_str(r#"{"maxScale": 3.0}"#).unwrap();
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(config.zoom_sensitivity, DEFAULT_ZOOM_SENSITIVITY);
        assert_eq!(config.eraser_color, "#FFFFFF");
    }

    #[test]
    fn sanitize_swaps_inverted_limits() {
        let config = ViewportConfig {
            min_scale: 2.0,
            max_scale: 0.5,
            zoom_sensitivity: 0.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 2.0);
        assert_eq!(config.zoom_sensitivity, DEFAULT_ZOOM_SENSITIVITY);
    }
}
