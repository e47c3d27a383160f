//! CPU raster backend on the `vello_cpu` sparse-strips renderer.
//!
//! Used for PNG export and for headless hosts. Drawing is recorded into a
//! [`RenderContext`]; [`RasterSurface::to_image`] rasterizes it into an
//! [`image::RgbaImage`].

use crate::surface::{ScreenRect, Surface};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use sk_core::model::{Color as SkColor, Point};
use vello_cpu::color::{AlphaColor, Srgb};
use vello_cpu::kurbo::{BezPath, Cap, Circle, Join, Rect, Shape, Stroke};
use vello_cpu::{Pixmap, RenderContext};

const PATH_TOLERANCE: f64 = 0.1;

pub struct RasterSurface {
    ctx: RenderContext,
    width: u16,
    height: u16,
    clip_depth: usize,
}

impl RasterSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ctx: RenderContext::new(width, height),
            width,
            height,
            clip_depth: 0,
        }
    }

    /// Rasterize everything drawn so far.
    pub fn to_image(&mut self) -> RgbaImage {
        let mut pixmap = Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let mut image = RgbaImage::new(u32::from(self.width), u32::from(self.height));
        for (dst, p) in image.pixels_mut().zip(pixmap.take_unpremultiplied()) {
            *dst = Rgba([p.r, p.g, p.b, p.a]);
        }
        image
    }
}

/// Encode pixels as a PNG file.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| format!("PNG encode error: {e}"))?;
    Ok(out)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_rect(rect: ScreenRect) -> Rect {
    Rect::new(rect.x, rect.y, rect.right(), rect.bottom())
}

fn to_color(css: &str) -> AlphaColor<Srgb> {
    let [r, g, b, a] = SkColor::from_css_or_black(css).to_rgba8();
    AlphaColor::from_rgba8(r, g, b, a)
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

impl Surface for RasterSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }

    fn clear(&mut self) {
        self.ctx.reset();
        self.clip_depth = 0;
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: &str) {
        self.ctx.set_paint(to_color(color));
        self.ctx.fill_rect(&to_rect(rect));
    }

    fn push_clip_rect(&mut self, rect: ScreenRect) {
        self.ctx.push_clip_layer(&to_rect(rect).to_path(PATH_TOLERANCE));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            log::warn!("pop_clip without a matching push_clip_rect");
            return;
        }
        self.ctx.pop_layer();
        self.clip_depth -= 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: &str) {
        self.ctx.set_paint(to_color(color));
        match points {
            [] => {}
            [dot] => {
                let circle = Circle::new((dot.x, dot.y), width / 2.0);
                self.ctx.fill_path(&circle.to_path(PATH_TOLERANCE));
            }
            _ => {
                self.ctx.set_stroke(Stroke {
                    width,
                    join: Join::Round,
                    start_cap: Cap::Round,
                    end_cap: Cap::Round,
                    ..Default::default()
                });
                self.ctx.stroke_path(&polyline_path(points));
            }
        }
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clip_depth", &self.clip_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fill_covers_aligned_rect() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(ScreenRect::new(2.0, 2.0, 3.0, 3.0), "#FF0000");
        let image = s.to_image();
        assert_eq!(image.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(5, 5).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn clip_limits_fills_and_nests() {
        let mut s = RasterSurface::new(10, 10);
        s.push_clip_rect(ScreenRect::new(0.0, 0.0, 5.0, 10.0));
        s.push_clip_rect(ScreenRect::new(3.0, 0.0, 7.0, 10.0));
        s.fill_rect(ScreenRect::new(0.0, 0.0, 10.0, 10.0), "#00F");
        s.pop_clip();
        s.pop_clip();
        let image = s.to_image();
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(3, 0).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(4, 0).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(5, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn unmatched_pop_is_ignored() {
        let mut s = RasterSurface::new(4, 4);
        s.pop_clip();
        s.fill_rect(ScreenRect::new(0.0, 0.0, 4.0, 4.0), "#FFFFFF");
        assert_eq!(s.to_image().get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn stroke_covers_its_path_only() {
        let mut s = RasterSurface::new(20, 20);
        s.fill_rect(ScreenRect::new(0.0, 0.0, 20.0, 20.0), "#FFFFFF");
        s.stroke_polyline(
            &[Point::new(2.0, 10.5), Point::new(18.0, 10.5)],
            3.0,
            "#000000",
        );
        let image = s.to_image();
        assert_eq!(image.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(10, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn single_point_draws_a_dot() {
        let mut s = RasterSurface::new(10, 10);
        s.stroke_polyline(&[Point::new(5.0, 5.0)], 4.0, "#000000");
        let image = s.to_image();
        assert_eq!(image.get_pixel(4, 4).0[3], 255);
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(ScreenRect::new(0.0, 0.0, 4.0, 4.0), "#123456");
        s.clear();
        assert!(s.to_image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn encodes_png() {
        let bytes = encode_png(&RgbaImage::new(3, 2)).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
