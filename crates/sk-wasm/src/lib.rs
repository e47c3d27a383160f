//! WASM bridge for SK: exposes the viewport controller to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host forwards DOM
//! pointer, touch, wheel and key events; every handler returns `true` when
//! the canvas needs a repaint.
//!
//! Event callbacks never run while the controller is borrowed: payloads are
//! queued during the call and delivered once it returns, so a callback may
//! call back into the canvas (`render()`, `getDataJson()`, `undo()`).

mod render2d;

use render2d::Canvas2dSurface;
use sk_core::StrokeId;
use sk_core::model::{MouseMode, PanZoomPatch, PenTool, Point, Viewport};
use sk_editor::controller::ViewportController;
use sk_editor::events::DataChange;
use sk_editor::input::{Modifiers, PointerInput, TouchPoint, WheelInput};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    DataChange,
    StrokeEnd,
}

/// Serialized event payloads waiting for delivery.
type Outbox = Rc<RefCell<VecDeque<(Channel, String)>>>;

/// The main WASM-facing sketch canvas.
#[wasm_bindgen]
pub struct SketchCanvas {
    controller: RefCell<ViewportController>,
    /// Set by `attach_context`; rendering is a no-op until then.
    ctx: RefCell<Option<CanvasRenderingContext2d>>,
    outbox: Outbox,
    on_data_change: RefCell<Option<js_sys::Function>>,
    on_stroke_end: RefCell<Option<js_sys::Function>>,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a canvas from a JSON options object (may be empty).
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<SketchCanvas, JsValue> {
        console_error_panic_hook_setup();
        let mut controller = if options_json.trim().is_empty() {
            ViewportController::default()
        } else {
            ViewportController::from_json(options_json)
                .map_err(|e| JsValue::from_str(&e))?
        };

        let outbox = Outbox::default();
        let sink = Rc::clone(&outbox);
        controller.on_data_change(move |event| match serde_json::to_string(event) {
            Ok(json) => sink.borrow_mut().push_back((Channel::DataChange, json)),
            Err(e) => log::warn!("cannot serialize DATA_CHANGE: {e}"),
        });
        let sink = Rc::clone(&outbox);
        controller.on_stroke_end(move |event| match serde_json::to_string(event) {
            Ok(json) => sink.borrow_mut().push_back((Channel::StrokeEnd, json)),
            Err(e) => log::warn!("cannot serialize STROKE_END: {e}"),
        });

        Ok(Self {
            controller: RefCell::new(controller),
            ctx: RefCell::new(None),
            outbox,
            on_data_change: RefCell::new(None),
            on_stroke_end: RefCell::new(None),
        })
    }

    /// Attach a 2D context; its canvas is resized to the current viewport.
    pub fn attach_context(&self, ctx: CanvasRenderingContext2d) {
        let (viewport, dpr) = self.size();
        resize_canvas(&ctx, viewport, dpr);
        *self.ctx.borrow_mut() = Some(ctx);
    }

    pub fn detach_context(&self) {
        *self.ctx.borrow_mut() = None;
    }

    /// Paint the current frame. Returns `false` without a context.
    pub fn render(&self) -> bool {
        let ctx = self.ctx.borrow();
        let Some(ctx) = ctx.as_ref() else {
            return false;
        };
        let mut surface = Canvas2dSurface::new(ctx);
        let mut controller = self.controller.borrow_mut();
        controller.render(&mut surface);
        controller.take_dirty();
        true
    }

    // ─── Mouse ───────────────────────────────────────────────────────────

    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        self.with(|c| c.pointer_down(&PointerInput::mouse(x, y)))
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.with(|c| c.pointer_move(&PointerInput::mouse(x, y)))
    }

    pub fn pointer_up(&self) -> bool {
        self.with(|c| c.pointer_up())
    }

    pub fn pointer_out(&self) -> bool {
        self.with(|c| c.pointer_out())
    }

    // ─── Touch ───────────────────────────────────────────────────────────

    /// `touches` is a flat `[x, y, onSurface, x, y, onSurface, ...]` list;
    /// `onSurface` is non-zero when the touch targets the canvas.
    pub fn touch_start(&self, touches: &[f64]) -> bool {
        self.with(|c| c.pointer_down(&parse_touches(touches)))
    }

    pub fn touch_move(&self, touches: &[f64]) -> bool {
        self.with(|c| c.pointer_move(&parse_touches(touches)))
    }

    pub fn touch_end(&self) -> bool {
        self.with(|c| c.pointer_up())
    }

    // ─── Wheel and keys ──────────────────────────────────────────────────

    pub fn wheel(
        &self,
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
        ctrl: bool,
        meta: bool,
    ) -> bool {
        let input = WheelInput {
            position: Point::new(x, y),
            delta_x,
            delta_y,
            modifiers: Modifiers {
                ctrl,
                meta,
                ..Default::default()
            },
        };
        self.with(|c| c.wheel(&input))
    }

    pub fn handle_key(&self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.with(|c| c.handle_shortcut(key, ctrl, shift, alt, meta))
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn change_brush_color(&self, color: &str) {
        self.with(|c| c.change_brush_color(color));
    }

    /// `"PEN"` or `"ERASER"` (case-insensitive). Returns `false` for
    /// anything else.
    pub fn change_brush_tool(&self, name: &str) -> bool {
        match parse_tool(name) {
            Some(tool) => {
                self.with(|c| c.change_brush_tool(tool));
                true
            }
            None => {
                log::warn!("unknown brush tool {name:?}");
                false
            }
        }
    }

    pub fn change_stroke_width(&self, width: f64) {
        self.with(|c| c.change_stroke_width(width));
    }

    pub fn undo(&self) -> bool {
        self.with(|c| c.undo())
    }

    pub fn redo(&self) -> bool {
        self.with(|c| c.redo())
    }

    pub fn can_undo(&self) -> bool {
        self.controller.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.controller.borrow().can_redo()
    }

    pub fn delete_stroke(&self, id: &str) -> bool {
        match id.parse::<StrokeId>() {
            Ok(id) => self.with(|c| c.delete_stroke(id)),
            Err(e) => {
                log::warn!("delete_stroke: {e}");
                false
            }
        }
    }

    /// Merge `{"scale"?: number, "offset"?: {"x", "y"}}` into the pan/zoom.
    pub fn set_pan_zoom(&self, json: &str) -> Result<bool, JsValue> {
        let patch: PanZoomPatch = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid pan/zoom: {e}")))?;
        Ok(self.with(|c| c.set_pan_zoom(patch)))
    }

    pub fn get_pan_zoom_json(&self) -> String {
        let controller = self.controller.borrow();
        serde_json::to_string(controller.pan_zoom()).unwrap_or_default()
    }

    /// Resize the viewport (CSS pixels) and, when a context is attached,
    /// the canvas backing store to `round(size * dpr)` device pixels.
    pub fn set_size(&self, width: f64, height: f64, dpr: f64) -> bool {
        let changed = self.with(|c| c.set_size(width, height, dpr));
        if let Some(ctx) = self.ctx.borrow().as_ref() {
            let (viewport, dpr) = self.size();
            resize_canvas(ctx, viewport, dpr);
        }
        changed
    }

    pub fn mouse_mode(&self) -> String {
        mode_name(self.controller.borrow().mouse_mode()).to_string()
    }

    /// PNG bytes of the drawing region at `width`×`height`.
    pub fn export_png(&self, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        self.controller
            .borrow()
            .export_region_png(width, height)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// The current `DATA_CHANGE` payload as JSON.
    pub fn get_data_json(&self) -> String {
        let controller = self.controller.borrow();
        let event = DataChange::new(controller.strokes(), controller.region());
        serde_json::to_string(&event).unwrap_or_default()
    }

    pub fn emit_current_data_change_event(&self) {
        self.with(|c| c.emit_current_data_change_event());
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Register the `DATA_CHANGE` callback; it receives the payload as a
    /// JSON string. Replaces any previous callback.
    pub fn set_on_data_change(&self, callback: js_sys::Function) {
        *self.on_data_change.borrow_mut() = Some(callback);
    }

    /// Register the `STROKE_END` callback (`{"stroke": ..., "color": ...}`).
    pub fn set_on_stroke_end(&self, callback: js_sys::Function) {
        *self.on_stroke_end.borrow_mut() = Some(callback);
    }
}

impl SketchCanvas {
    /// Run `f` on the controller, then deliver whatever it emitted.
    fn with<R>(&self, f: impl FnOnce(&mut ViewportController) -> R) -> R {
        let result = f(&mut self.controller.borrow_mut());
        self.dispatch();
        result
    }

    fn size(&self) -> (Viewport, f64) {
        let controller = self.controller.borrow();
        (controller.viewport(), controller.dpr())
    }

    fn dispatch(&self) {
        self.dispatch_with(|channel, json| {
            let callback = match channel {
                Channel::DataChange => self.on_data_change.borrow().clone(),
                Channel::StrokeEnd => self.on_stroke_end.borrow().clone(),
            };
            if let Some(callback) = callback {
                call_js(&callback, json);
            }
        });
    }

    /// Pop queued payloads one at a time; no borrow is held while
    /// `deliver` runs.
    fn dispatch_with(&self, mut deliver: impl FnMut(Channel, &str)) {
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            let Some((channel, json)) = next else {
                break;
            };
            deliver(channel, &json);
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn call_js(callback: &js_sys::Function, json: &str) {
    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(json)) {
        log::warn!("SK callback threw: {err:?}");
    }
}

/// Backing-store size in device pixels.
fn backing_size(viewport: Viewport, dpr: f64) -> (u32, u32) {
    let px = |css: f64| (css * dpr).round().max(0.0) as u32;
    (px(viewport.width), px(viewport.height))
}

fn resize_canvas(ctx: &CanvasRenderingContext2d, viewport: Viewport, dpr: f64) {
    let Some(canvas) = ctx.canvas() else {
        return;
    };
    let (width, height) = backing_size(viewport, dpr);
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", viewport.width));
    let _ = style.set_property("height", &format!("{}px", viewport.height));
}

fn parse_touches(flat: &[f64]) -> PointerInput {
    PointerInput::touches(flat.chunks_exact(3).map(|c| TouchPoint {
        x: c[0],
        y: c[1],
        on_surface: c[2] != 0.0,
    }))
}

fn parse_tool(name: &str) -> Option<PenTool> {
    match name.to_ascii_uppercase().as_str() {
        "PEN" => Some(PenTool::Pen),
        "ERASER" => Some(PenTool::Eraser),
        _ => None,
    }
}

fn mode_name(mode: MouseMode) -> &'static str {
    match mode {
        MouseMode::Drawing => "DRAWING",
        MouseMode::Panning => "PANNING",
        MouseMode::Extending => "EXTENDING",
    }
}

// ─── Console ─────────────────────────────────────────────────────────────────

/// Forwards `log` records to the browser console.
#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// Set up a panic hook and `log` sink that write to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("SK WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&CONSOLE_LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Warn);
            }
        });
    }
}
