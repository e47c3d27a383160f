//! Data model shared by every SK crate.
//!
//! Coordinates come in two flavors:
//! - **world**: pan/zoom independent, origin at the surface center;
//! - **screen**: CSS-pixel offsets from the surface's top-left corner.
//!
//! Conversions between them live in [`crate::transform`].

use crate::config::{DEFAULT_REGION_HEIGHT, DEFAULT_REGION_WIDTH};
use crate::id::StrokeId;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of the interaction surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Screen position of the world origin before pan/zoom is applied.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Scale and screen-space translation of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanZoom {
    pub scale: f64,
    pub offset: Point,
}

impl Default for PanZoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ZERO,
        }
    }
}

/// Partial pan/zoom update. Missing fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanZoomPatch {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub offset: Option<Point>,
}

/// The bounded rectangle strokes are drawn in, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRegion {
    pub left_top_x: f64,
    pub left_top_y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawingRegion {
    pub const fn new(left_top_x: f64, left_top_y: f64, width: f64, height: f64) -> Self {
        Self {
            left_top_x,
            left_top_y,
            width,
            height,
        }
    }

    pub fn left_top(&self) -> Point {
        Point::new(self.left_top_x, self.left_top_y)
    }

    pub fn right(&self) -> f64 {
        self.left_top_x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.left_top_y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left_top_x + self.width / 2.0,
            self.left_top_y + self.height / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left_top_x
            && p.x <= self.right()
            && p.y >= self.left_top_y
            && p.y <= self.bottom()
    }
}

impl Default for DrawingRegion {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_REGION_WIDTH, DEFAULT_REGION_HEIGHT)
    }
}

// ─── Strokes ─────────────────────────────────────────────────────────────

/// One continuous pointer-down-to-up brush path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    #[serde(default)]
    pub id: StrokeId,
    /// CSS color string as chosen by the host (`#RRGGBB` etc.).
    pub color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(color: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            id: StrokeId::new(),
            color: color.into(),
            stroke_width,
            points: Vec::new(),
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }
}

// ─── Interaction enums ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PenTool {
    #[default]
    Pen,
    /// Paints with the configured eraser color over existing strokes.
    Eraser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MouseMode {
    #[default]
    Drawing,
    Panning,
    Extending,
}

/// Which handle of the region a resize gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HandleDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleDirection {
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    /// Split a corner into its (vertical, horizontal) edges.
    pub fn split_corner(self) -> Option<(HandleDirection, HandleDirection)> {
        match self {
            Self::TopLeft => Some((Self::Top, Self::Left)),
            Self::TopRight => Some((Self::Top, Self::Right)),
            Self::BottomLeft => Some((Self::Bottom, Self::Left)),
            Self::BottomRight => Some((Self::Bottom, Self::Right)),
            _ => None,
        }
    }

    /// Dragging this handle moves the region's left edge.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Dragging this handle moves the region's top edge.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn affects_width(self) -> bool {
        !matches!(self, Self::Top | Self::Bottom)
    }

    pub fn affects_height(self) -> bool {
        !matches!(self, Self::Left | Self::Right)
    }
}

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| -> Option<f32> { Some((hex_val(bytes[i])? * 17) as f32 / 255.0) };
        let long = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Like [`Color::from_hex`], falling back to opaque black.
    pub fn from_css_or_black(css: &str) -> Self {
        Self::from_hex(css).unwrap_or_else(|| {
            log::trace!("unparseable color {css:?}, drawing black");
            Self::BLACK
        })
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as `#RRGGBB` (or `#RRGGBBAA` when translucent).
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn region_contains_is_inclusive() {
        let region = DrawingRegion::default();
        assert!(region.contains(Point::new(0.0, 0.0)));
        assert!(region.contains(Point::new(150.0, 150.0)));
        assert!(region.contains(Point::new(75.0, 10.0)));
        assert!(!region.contains(Point::new(150.1, 10.0)));
        assert!(!region.contains(Point::new(-0.1, 10.0)));
    }

    #[test]
    fn default_region_is_150_square_at_origin() {
        assert_eq!(DrawingRegion::default(), DrawingRegion::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn corners_split_into_edges() {
        assert_eq!(
            HandleDirection::BottomLeft.split_corner(),
            Some((HandleDirection::Bottom, HandleDirection::Left))
        );
        assert_eq!(HandleDirection::Right.split_corner(), None);
        assert!(HandleDirection::TopLeft.moves_left_edge());
        assert!(HandleDirection::TopLeft.moves_top_edge());
        assert!(!HandleDirection::Bottom.affects_width());
    }

    #[test]
    fn color_hex_forms() {
        assert_eq!(Color::from_hex("#FF0000").unwrap().to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::from_hex("#fff").unwrap().to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::from_hex("00ff0080").unwrap().to_rgba8(), [0, 255, 0, 128]);
        assert!(Color::from_hex("red").is_none());
        assert_eq!(Color::from_css_or_black("red"), Color::BLACK);
        assert_eq!(Color::from_hex("#999999").unwrap().to_hex(), "#999999");
    }

    #[test]
    fn stroke_wire_format_is_camel_case() {
        let stroke = Stroke::new("#FF0000", 3.0).with_points([Point::new(1.0, 2.0)]);
        let json = serde_json::to_value(&stroke).unwrap();
        assert_eq!(json["strokeWidth"], 3.0);
        assert_eq!(json["points"][0]["x"], 1.0);

        let back: Stroke = serde_json::from_value(json).unwrap();
        assert_eq!(back, stroke);
    }

    #[test]
    fn stroke_without_id_gets_one() {
        let stroke: Stroke =
            serde_json::from_str(r##"{"color":"#000","strokeWidth":2,"points":[]}"##).unwrap();
        assert_eq!(stroke.color, "#000");
        assert!(stroke.points.is_empty());
    }

    #[test]
    fn tool_names_match_host_strings() {
        assert_eq!(serde_json::to_string(&PenTool::Eraser).unwrap(), "\"ERASER\"");
        assert_eq!(
            serde_json::to_string(&HandleDirection::BottomRight).unwrap(),
            "\"BOTTOMRIGHT\""
        );
    }
}
