//! Viewport controller: the single owner of interactive sketch state.
//!
//! A gesture starts on pointer-down and picks one of three modes from the
//! down point:
//!
//! | Down point            | Mode        | Moves                                |
//! |-----------------------|-------------|--------------------------------------|
//! | on a region handle    | `Extending` | resize the region live               |
//! | inside the region     | `Drawing`   | append points to the pending stroke  |
//! | elsewhere / 2 touches | `Panning`   | translate the offset, or pinch-zoom  |
//!
//! Pointer-up and pointer-out both finalize the gesture. Every finalized
//! change goes through [`ViewportController::commit`] and is recorded in the
//! [`History`], so undo/redo replays exactly the same code path.
//!
//! Handlers return `true` when something visible changed; hosts re-render
//! then (or poll [`ViewportController::take_dirty`]).

use crate::commands::{Action, History};
use crate::events::{DataChange, EventHub, ListenerId, StrokeEnd};
use crate::extend::extend;
use crate::input::{InputEvent, PinchTracker, PointerInput, WheelInput, wheel_zoom_factor};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::Brush;
use serde::{Deserialize, Serialize};
use sk_core::ViewportConfig;
use sk_core::id::StrokeId;
use sk_core::model::{
    DrawingRegion, HandleDirection, MouseMode, PanZoom, PanZoomPatch, PenTool, Point, Stroke,
    Viewport,
};
use sk_core::transform::{
    centered_offset, clamp_offset, clamp_scale, screen_to_world, zoom_about,
};
use sk_render::paint::{CanvasTheme, Frame, render_frame, render_region};
use sk_render::raster::{RasterSurface, encode_png};
use sk_render::surface::Surface;
use sk_render::{detect_handle, region_contains};

/// Default raster export size, in pixels.
pub const DEFAULT_EXPORT_SIZE: u32 = 512;

/// Zoom step for the keyboard zoom shortcuts.
const KEYBOARD_ZOOM_STEP: f64 = 1.1;

/// Constructor options. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerOptions {
    pub viewport: Viewport,
    pub dpr: f64,
    pub region: DrawingRegion,
    pub strokes: Vec<Stroke>,
    /// Initial pan/zoom; the region is centered at scale 1 when absent.
    pub pan_zoom: Option<PanZoom>,
    pub config: ViewportConfig,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            dpr: 1.0,
            region: DrawingRegion::default(),
            strokes: Vec::new(),
            pan_zoom: None,
            config: ViewportConfig::default(),
        }
    }
}

/// The live gesture. Exactly one exists at a time.
#[derive(Debug, Clone)]
enum Interaction {
    Idle,
    Drawing {
        stroke: Stroke,
    },
    Panning {
        /// Previous primary position; `None` right after a pinch.
        last: Option<Point>,
        pinch: PinchTracker,
    },
    Extending {
        direction: HandleDirection,
        down_world: Point,
        captured: DrawingRegion,
    },
}

#[derive(Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    viewport: Viewport,
    dpr: f64,
    pan_zoom: PanZoom,
    region: DrawingRegion,
    strokes: Vec<Stroke>,
    history: History,
    brush: Brush,
    theme: CanvasTheme,
    interaction: Interaction,
    events: EventHub,
    dirty: bool,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}

impl ViewportController {
    pub fn new(options: ControllerOptions) -> Self {
        let config = options.config.sanitized();
        let viewport = options.viewport;
        let region = options.region;
        let pan_zoom = match options.pan_zoom {
            Some(pz) => PanZoom {
                scale: clamp_scale(pz.scale, &config),
                offset: pz.offset,
            },
            None => {
                let scale = clamp_scale(1.0, &config);
                PanZoom {
                    scale,
                    offset: centered_offset(&region, scale, viewport),
                }
            }
        };
        let mut controller = Self {
            history: History::new(config.history_depth),
            config,
            viewport,
            dpr: if options.dpr > 0.0 { options.dpr } else { 1.0 },
            pan_zoom,
            region,
            strokes: options.strokes,
            brush: Brush::default(),
            theme: CanvasTheme::default(),
            interaction: Interaction::Idle,
            events: EventHub::default(),
            dirty: true,
        };
        controller.reclamp_offset();
        controller
    }

    /// Parse [`ControllerOptions`] from JSON and build a controller.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let options: ControllerOptions =
            serde_json::from_str(json).map_err(|e| format!("invalid controller options: {e}"))?;
        Ok(Self::new(options))
    }

    // ─── Coordinates ─────────────────────────────────────────────────────

    pub fn to_world(&self, screen: Point) -> Point {
        screen_to_world(screen, &self.pan_zoom, self.viewport)
    }

    fn reclamp_offset(&mut self) {
        self.pan_zoom.offset =
            clamp_offset(self.pan_zoom.offset, &self.pan_zoom, &self.region, self.viewport);
    }

    fn pan_by(&mut self, delta: Point) -> bool {
        let candidate = self.pan_zoom.offset + delta;
        let offset = clamp_offset(candidate, &self.pan_zoom, &self.region, self.viewport);
        if offset == self.pan_zoom.offset {
            return false;
        }
        log::trace!("pan to {offset:?}");
        self.pan_zoom.offset = offset;
        self.dirty = true;
        true
    }

    /// Multiply the scale by `factor`, keeping the world point under
    /// `anchor` (screen) fixed. The result is clamped.
    pub fn zoom_around(&mut self, factor: f64, anchor: Point) -> bool {
        let scale = clamp_scale(self.pan_zoom.scale * factor, &self.config);
        if scale == self.pan_zoom.scale {
            return false;
        }
        let offset = zoom_about(anchor, &self.pan_zoom, scale);
        self.pan_zoom = PanZoom { scale, offset };
        self.reclamp_offset();
        log::trace!("zoom to {scale}");
        self.dirty = true;
        true
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(input) => self.pointer_down(input),
            InputEvent::PointerMove(input) => self.pointer_move(input),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::PointerOut => self.pointer_out(),
            InputEvent::Wheel(wheel) => self.wheel(wheel),
        }
    }

    pub fn pointer_down(&mut self, input: &PointerInput) -> bool {
        if !matches!(self.interaction, Interaction::Idle) {
            log::trace!("pointer_down ignored: gesture already active");
            return false;
        }
        let Some(screen) = input.primary() else {
            return false;
        };

        if input.touch_count() >= 2 {
            let mut pinch = PinchTracker::default();
            if let Some(p) = input.pinch() {
                pinch.update(p.distance, self.config.zoom_sensitivity);
            }
            self.interaction = Interaction::Panning { last: None, pinch };
            log::debug!("mode: PANNING (multi-touch)");
            return false;
        }

        let world = self.to_world(screen);
        if let Some(direction) =
            detect_handle(world, &self.region, self.pan_zoom.scale, &self.config)
        {
            self.interaction = Interaction::Extending {
                direction,
                down_world: world,
                captured: self.region,
            };
            log::debug!("mode: EXTENDING {direction:?}");
            false
        } else if region_contains(&self.region, world) {
            let stroke = self
                .brush
                .begin_stroke(&self.config.eraser_color)
                .with_points([world]);
            self.interaction = Interaction::Drawing { stroke };
            log::debug!("mode: DRAWING");
            self.dirty = true;
            true
        } else {
            self.interaction = Interaction::Panning {
                last: Some(screen),
                pinch: PinchTracker::default(),
            };
            log::debug!("mode: PANNING");
            false
        }
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        let Some(screen) = input.primary() else {
            return false;
        };
        let world = self.to_world(screen);
        let sensitivity = self.config.zoom_sensitivity;

        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Drawing { stroke } => {
                if input.touch_count() > 1 {
                    return false;
                }
                stroke.points.push(world);
                self.dirty = true;
                true
            }
            Interaction::Panning { last, pinch } => {
                if let Some(p) = input.pinch() {
                    *last = None;
                    match pinch.update(p.distance, sensitivity) {
                        Some(zoom) => self.zoom_around(zoom, p.center),
                        None => false,
                    }
                } else if input.touch_count() > 1 {
                    false
                } else {
                    pinch.reset();
                    match last.replace(screen) {
                        Some(prev) => self.pan_by(screen - prev),
                        None => false,
                    }
                }
            }
            Interaction::Extending {
                direction,
                down_world,
                captured,
            } => {
                let region = extend(
                    captured,
                    *direction,
                    world - *down_world,
                    self.config.min_region_size,
                );
                if region == self.region {
                    return false;
                }
                log::trace!("extend to {region:?}");
                self.region = region;
                self.dirty = true;
                true
            }
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        self.finalize()
    }

    /// Pointer left the surface: finalize exactly like pointer-up.
    pub fn pointer_out(&mut self) -> bool {
        self.finalize()
    }

    fn finalize(&mut self) -> bool {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle | Interaction::Panning { .. } => false,
            Interaction::Drawing { stroke } => {
                if stroke.points.len() < 2 {
                    log::debug!("discarding stroke without movement");
                    self.dirty = true;
                    return true;
                }
                let index = self.strokes.len();
                let action = Action::Paint { stroke, index };
                self.commit(action.clone());
                self.history.record(action);
                if let Some(stroke) = self.strokes.get(index) {
                    self.events.emit_stroke_end(&StrokeEnd {
                        stroke,
                        color: &stroke.color,
                    });
                }
                true
            }
            Interaction::Extending { captured, .. } => {
                if self.region == captured {
                    return false;
                }
                self.history.record(Action::RegionResize {
                    before: captured,
                    after: self.region,
                });
                self.reclamp_offset();
                self.dirty = true;
                self.emit_current_data_change_event();
                true
            }
        }
    }

    /// Wheel: zoom around the cursor with ctrl/⌘ held, pan otherwise.
    pub fn wheel(&mut self, wheel: &WheelInput) -> bool {
        if matches!(self.interaction, Interaction::Extending { .. }) {
            return false;
        }
        if wheel.modifiers.command() {
            let zoom = wheel_zoom_factor(wheel.delta_y, self.config.zoom_sensitivity);
            self.zoom_around(zoom, wheel.position)
        } else {
            self.pan_by(Point::new(-wheel.delta_x, -wheel.delta_y))
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Apply an action to the sketch and broadcast `DATA_CHANGE`. Does not
    /// touch the history.
    pub fn commit(&mut self, action: Action) -> bool {
        log::debug!("commit: {}", action.description());
        match action {
            Action::Paint { stroke, index } => {
                let index = index.min(self.strokes.len());
                self.strokes.insert(index, stroke);
            }
            Action::Erase { stroke, index } => {
                let at_index = self.strokes.get(index).is_some_and(|s| s.id == stroke.id);
                let position = if at_index {
                    Some(index)
                } else {
                    self.strokes.iter().position(|s| s.id == stroke.id)
                };
                let Some(position) = position else {
                    log::warn!("erase: stroke {} not found", stroke.id);
                    return false;
                };
                self.strokes.remove(position);
            }
            Action::RegionResize { after, .. } => {
                self.region = after;
                self.reclamp_offset();
            }
        }
        self.dirty = true;
        self.emit_current_data_change_event();
        true
    }

    pub fn undo(&mut self) -> bool {
        if matches!(self.interaction, Interaction::Extending { .. }) {
            return false;
        }
        match self.history.undo() {
            Some(action) => self.commit(action),
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if matches!(self.interaction, Interaction::Extending { .. }) {
            return false;
        }
        match self.history.redo() {
            Some(action) => self.commit(action),
            None => false,
        }
    }

    /// Remove a committed stroke; undo puts it back at the same index.
    pub fn delete_stroke(&mut self, id: StrokeId) -> bool {
        let Some(index) = self.strokes.iter().position(|s| s.id == id) else {
            return false;
        };
        let action = Action::Erase {
            stroke: self.strokes[index].clone(),
            index,
        };
        self.commit(action.clone());
        self.history.record(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Host commands ───────────────────────────────────────────────────

    pub fn change_brush_color(&mut self, color: impl Into<String>) {
        self.brush.color = color.into();
    }

    pub fn change_brush_tool(&mut self, tool: PenTool) {
        self.brush.tool = tool;
    }

    pub fn change_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.brush.width = width;
        } else {
            log::warn!("ignoring stroke width {width}");
        }
    }

    pub fn set_theme(&mut self, theme: CanvasTheme) {
        self.theme = theme;
        self.dirty = true;
    }

    /// Merge a partial pan/zoom; scale is clamped and the offset re-clamped.
    pub fn set_pan_zoom(&mut self, patch: PanZoomPatch) -> bool {
        if let Some(scale) = patch.scale {
            self.pan_zoom.scale = clamp_scale(scale, &self.config);
        }
        if let Some(offset) = patch.offset {
            self.pan_zoom.offset = offset;
        }
        self.reclamp_offset();
        self.dirty = true;
        true
    }

    /// Resize the interaction surface. World content is untouched.
    pub fn set_size(&mut self, width: f64, height: f64, dpr: f64) -> bool {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        if dpr > 0.0 {
            self.dpr = dpr;
        }
        self.reclamp_offset();
        self.dirty = true;
        true
    }

    /// Center the region at scale 1 (clamped).
    pub fn reset_view(&mut self) -> bool {
        let scale = clamp_scale(1.0, &self.config);
        self.pan_zoom = PanZoom {
            scale,
            offset: centered_offset(&self.region, scale, self.viewport),
        };
        self.reclamp_offset();
        self.dirty = true;
        true
    }

    pub fn handle_shortcut(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return false;
        };
        let center = self.viewport.center();
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ToolPen => {
                self.change_brush_tool(PenTool::Pen);
                false
            }
            ShortcutAction::ToolEraser => {
                self.change_brush_tool(PenTool::Eraser);
                false
            }
            ShortcutAction::ZoomIn => self.zoom_around(KEYBOARD_ZOOM_STEP, center),
            ShortcutAction::ZoomOut => self.zoom_around(1.0 / KEYBOARD_ZOOM_STEP, center),
            ShortcutAction::ResetView => self.reset_view(),
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn emit_current_data_change_event(&mut self) {
        self.events
            .emit_data_change(&DataChange::new(&self.strokes, &self.region));
    }

    pub fn on_data_change(
        &mut self,
        listener: impl FnMut(&DataChange<'_>) + 'static,
    ) -> ListenerId {
        self.events.on_data_change(listener)
    }

    pub fn on_stroke_end(&mut self, listener: impl FnMut(&StrokeEnd<'_>) + 'static) -> ListenerId {
        self.events.on_stroke_end(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Paint the current frame. `surface` is expected to be sized in device
    /// pixels (viewport × dpr).
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let frame = Frame {
            strokes: &self.strokes,
            pending: self.pending_stroke(),
            region: &self.region,
            pan_zoom: &self.pan_zoom,
            viewport: self.viewport,
            dpr: self.dpr,
        };
        render_frame(surface, &frame, &self.theme);
    }

    /// Render only the drawing region into a `width`×`height` image.
    pub fn export_region(&self, width: u32, height: u32) -> Result<image::RgbaImage, String> {
        if width == 0 || height == 0 {
            return Err(format!("cannot export a {width}x{height} image"));
        }
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(format!("export size {width}x{height} is too large"));
        };
        let mut surface = RasterSurface::new(w, h);
        render_region(&mut surface, &self.strokes, &self.region, &self.theme);
        Ok(surface.to_image())
    }

    /// Like [`Self::export_region`], encoded as PNG.
    pub fn export_region_png(&self, width: u32, height: u32) -> Result<Vec<u8>, String> {
        encode_png(&self.export_region(width, height)?)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke being drawn, if a drawing gesture is live.
    pub fn pending_stroke(&self) -> Option<&Stroke> {
        match &self.interaction {
            Interaction::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }

    pub fn region(&self) -> &DrawingRegion {
        &self.region
    }

    pub fn pan_zoom(&self) -> &PanZoom {
        &self.pan_zoom
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Mode of the live gesture; `Drawing` when idle.
    pub fn mouse_mode(&self) -> MouseMode {
        match self.interaction {
            Interaction::Idle | Interaction::Drawing { .. } => MouseMode::Drawing,
            Interaction::Panning { .. } => MouseMode::Panning,
            Interaction::Extending { .. } => MouseMode::Extending,
        }
    }

    pub fn is_interacting(&self) -> bool {
        !matches!(self.interaction, Interaction::Idle)
    }

    /// Return and reset the needs-repaint flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
