//! Observer lists for controller events.
//!
//! Payloads borrow from the controller; listeners that need to keep data
//! around clone it (or serialize it, as the wasm bridge does).

use serde::Serialize;
use sk_core::model::{DrawingRegion, Stroke};
use std::fmt;

/// Broadcast after every committed action and on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataChange<'a> {
    pub strokes: &'a [Stroke],
    pub region_width: f64,
    pub region_height: f64,
    pub region_left_top_x: f64,
    pub region_left_top_y: f64,
}

impl<'a> DataChange<'a> {
    pub fn new(strokes: &'a [Stroke], region: &DrawingRegion) -> Self {
        Self {
            strokes,
            region_width: region.width,
            region_height: region.height,
            region_left_top_x: region.left_top_x,
            region_left_top_y: region.left_top_y,
        }
    }
}

/// Fired once per finalized paint stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeEnd<'a> {
    pub stroke: &'a Stroke,
    /// Brush color the stroke was drawn with.
    pub color: &'a str,
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type DataChangeListener = Box<dyn FnMut(&DataChange<'_>)>;
type StrokeEndListener = Box<dyn FnMut(&StrokeEnd<'_>)>;

#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    data_change: Vec<(ListenerId, DataChangeListener)>,
    stroke_end: Vec<(ListenerId, StrokeEndListener)>,
}

impl EventHub {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn on_data_change(
        &mut self,
        listener: impl FnMut(&DataChange<'_>) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.data_change.push((id, Box::new(listener)));
        id
    }

    pub fn on_stroke_end(&mut self, listener: impl FnMut(&StrokeEnd<'_>) + 'static) -> ListenerId {
        let id = self.next_id();
        self.stroke_end.push((id, Box::new(listener)));
        id
    }

    /// Detach a listener of either kind. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.data_change.len() + self.stroke_end.len();
        self.data_change.retain(|(l, _)| *l != id);
        self.stroke_end.retain(|(l, _)| *l != id);
        before != self.data_change.len() + self.stroke_end.len()
    }

    pub fn emit_data_change(&mut self, event: &DataChange<'_>) {
        log::trace!("DATA_CHANGE: {} strokes", event.strokes.len());
        for (_, listener) in &mut self.data_change {
            listener(event);
        }
    }

    pub fn emit_stroke_end(&mut self, event: &StrokeEnd<'_>) {
        log::trace!("STROKE_END: {:?}", event.stroke.id);
        for (_, listener) in &mut self.stroke_end {
            listener(event);
        }
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("data_change", &self.data_change.len())
            .field("stroke_end", &self.stroke_end.len())
            .finish()
    }
}
