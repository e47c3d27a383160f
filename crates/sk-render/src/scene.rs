//! Vello scene backend.
//!
//! Records the frame into a [`vello::Scene`] for GPU hosts; the host owns
//! the renderer and presents the scene itself.

use crate::surface::{ScreenRect, Surface};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Rect, Stroke as KurboStroke};
use peniko::{Color, Fill, Mix};
use sk_core::model::{Color as SkColor, Point};
use vello::Scene;

pub struct SceneSurface {
    scene: Scene,
    width: f64,
    height: f64,
    clip_depth: usize,
}

impl SceneSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scene: Scene::new(),
            width,
            height,
            clip_depth: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_rect(rect: ScreenRect) -> Rect {
    Rect::new(rect.x, rect.y, rect.right(), rect.bottom())
}

fn to_peniko(css: &str) -> Color {
    let [r, g, b, a] = SkColor::from_css_or_black(css).to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to((first.x, first.y));
    }
    for p in iter {
        path.line_to((p.x, p.y));
    }
    path
}

impl Surface for SceneSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.scene.reset();
        self.clip_depth = 0;
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: &str) {
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            to_peniko(color),
            None,
            &to_rect(rect),
        );
    }

    fn push_clip_rect(&mut self, rect: ScreenRect) {
        self.scene
            .push_layer(Mix::Clip, 1.0, Affine::IDENTITY, &to_rect(rect));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            log::warn!("pop_clip without a matching push_clip_rect");
            return;
        }
        self.scene.pop_layer();
        self.clip_depth -= 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: &str) {
        let color = to_peniko(color);
        match points {
            [] => {}
            [dot] => {
                let circle = Circle::new((dot.x, dot.y), width / 2.0);
                self.scene
                    .fill(Fill::NonZero, Affine::IDENTITY, color, None, &circle);
            }
            _ => {
                let stroke = KurboStroke {
                    width,
                    join: Join::Round,
                    start_cap: Cap::Round,
                    end_cap: Cap::Round,
                    ..Default::default()
                };
                self.scene.stroke(
                    &stroke,
                    Affine::IDENTITY,
                    color,
                    None,
                    &polyline_path(points),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasTheme, Frame, render_frame};
    use pretty_assertions::assert_eq;
    use sk_core::model::{DrawingRegion, PanZoom, Stroke, Viewport};

    #[test]
    fn polyline_path_has_one_segment_per_pair() {
        let path = polyline_path(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ]);
        assert_eq!(path.elements().len(), 3);
    }

    #[test]
    fn color_conversion() {
        let red = to_peniko("#FF000080").components;
        assert_eq!(red[0], 1.0);
        assert_eq!(red[1], 0.0);
        assert!((red[3] - 128.0 / 255.0).abs() < 1e-3);
        assert_eq!(to_peniko("nonsense").components, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn frame_leaves_clips_balanced() {
        let strokes =
            vec![Stroke::new("#000", 2.0).with_points([Point::ZERO, Point::new(5.0, 5.0)])];
        let region = DrawingRegion::default();
        let pan_zoom = PanZoom::default();
        let frame = Frame {
            strokes: &strokes,
            pending: None,
            region: &region,
            pan_zoom: &pan_zoom,
            viewport: Viewport::new(800.0, 600.0),
            dpr: 1.0,
        };
        let mut surface = SceneSurface::new(800.0, 600.0);
        render_frame(&mut surface, &frame, &CanvasTheme::light());
        assert_eq!(surface.clip_depth(), 0);
        surface.pop_clip();
        assert_eq!(surface.clip_depth(), 0);
    }
}
