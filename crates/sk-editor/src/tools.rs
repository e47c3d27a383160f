//! Brush settings.
//!
//! The brush is the only tool state: which pen is active, its color and its
//! width. Changes apply from the next stroke on.

use sk_core::model::{PenTool, Stroke};

pub const DEFAULT_BRUSH_COLOR: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub tool: PenTool,
    pub color: String,
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: PenTool::Pen,
            color: DEFAULT_BRUSH_COLOR.to_string(),
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Brush {
    /// Color the next stroke is painted with: the brush color for the pen,
    /// `eraser_color` for the eraser.
    pub fn paint_color<'a>(&'a self, eraser_color: &'a str) -> &'a str {
        match self.tool {
            PenTool::Pen => &self.color,
            PenTool::Eraser => eraser_color,
        }
    }

    /// Start a new, empty stroke with this brush.
    pub fn begin_stroke(&self, eraser_color: &str) -> Stroke {
        Stroke::new(self.paint_color(eraser_color), self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pen_uses_brush_color() {
        let brush = Brush {
            color: "#FF0000".into(),
            width: 5.0,
            ..Default::default()
        };
        let stroke = brush.begin_stroke("#FFFFFF");
        assert_eq!(stroke.color, "#FF0000");
        assert_eq!(stroke.stroke_width, 5.0);
        assert!(stroke.points.is_empty());
    }

    #[test]
    fn eraser_uses_eraser_color() {
        let brush = Brush {
            tool: PenTool::Eraser,
            color: "#FF0000".into(),
            ..Default::default()
        };
        assert_eq!(brush.paint_color("#FFF"), "#FFF");
        assert_eq!(brush.begin_stroke("#FFF").stroke_width, DEFAULT_STROKE_WIDTH);
    }
}
