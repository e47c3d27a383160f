//! Canvas2D surface.
//!
//! Draws to an HTML `<canvas>` via `CanvasRenderingContext2d`. Clips map to
//! `save()`/`clip()`/`restore()` pairs.

use sk_core::model::Point;
use sk_render::surface::{ScreenRect, Surface};
use web_sys::CanvasRenderingContext2d;

pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
    clip_depth: usize,
}

impl<'a> Canvas2dSurface<'a> {
    /// Wrap a context; the size is read from its backing canvas.
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        let (width, height) = ctx
            .canvas()
            .map(|canvas| (canvas.width() as f64, canvas.height() as f64))
            .unwrap_or((0.0, 0.0));
        Self {
            ctx,
            width,
            height,
            clip_depth: 0,
        }
    }
}

impl Surface for Canvas2dSurface<'_> {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn push_clip_rect(&mut self, rect: ScreenRect) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
        self.ctx.clip();
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            return;
        }
        self.ctx.restore();
        self.clip_depth -= 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: &str) {
        let ctx = self.ctx;
        match points {
            [] => {}
            [dot] => {
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                let _ = ctx.arc(dot.x, dot.y, width / 2.0, 0.0, std::f64::consts::TAU);
                ctx.fill();
            }
            [first, rest @ ..] => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(width);
                ctx.set_line_cap("round");
                ctx.set_line_join("round");
                ctx.begin_path();
                ctx.move_to(first.x, first.y);
                for p in rest {
                    ctx.line_to(p.x, p.y);
                }
                ctx.stroke();
            }
        }
    }
}
