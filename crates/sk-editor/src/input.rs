//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a uniform pointer model consumed
//! by the controller. All positions are screen coordinates (CSS pixels
//! relative to the interaction surface).

use sk_core::model::Point;
use smallvec::SmallVec;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// One finger of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    /// Whether the touch started on the interaction surface (as opposed to
    /// some other element the host forwards events from).
    pub on_surface: bool,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            on_surface: true,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Two-finger gesture summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    /// Manhattan distance between the two touches.
    pub distance: f64,
    pub center: Point,
}

/// Position payload of a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(Point),
    Touch(SmallVec<[TouchPoint; 4]>),
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse(Point::new(x, y))
    }

    pub fn touches(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self::Touch(points.into_iter().collect())
    }

    /// The point the gesture follows: the mouse position, or the first touch
    /// on the surface (falling back to the first touch at all).
    pub fn primary(&self) -> Option<Point> {
        match self {
            Self::Mouse(p) => Some(*p),
            Self::Touch(touches) => touches
                .iter()
                .find(|t| t.on_surface)
                .or_else(|| touches.first())
                .map(TouchPoint::position),
        }
    }

    pub fn touch_count(&self) -> usize {
        match self {
            Self::Mouse(_) => 1,
            Self::Touch(touches) => touches.len(),
        }
    }

    /// Pinch summary, available only with exactly two touches on the surface.
    pub fn pinch(&self) -> Option<Pinch> {
        let Self::Touch(touches) = self else {
            return None;
        };
        let mut on_surface = touches.iter().filter(|t| t.on_surface);
        let (a, b) = (on_surface.next()?, on_surface.next()?);
        if on_surface.next().is_some() {
            return None;
        }
        Some(Pinch {
            distance: (a.x - b.x).abs() + (a.y - b.y).abs(),
            center: a.position().midpoint(b.position()),
        })
    }
}

/// A wheel / trackpad scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Cursor position.
    pub position: Point,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down or touch start.
    PointerDown(PointerInput),
    /// Mouse move or touch move.
    PointerMove(PointerInput),
    /// Mouse up or touch end.
    PointerUp,
    /// Pointer left the surface or the touch was cancelled.
    PointerOut,
    Wheel(WheelInput),
}

/// Zoom factor for one wheel step: `1 - delta_y / sensitivity`.
pub fn wheel_zoom_factor(delta_y: f64, sensitivity: f64) -> f64 {
    1.0 - delta_y / sensitivity
}

/// Zoom factor between two successive pinch samples. Spreading the
/// fingers (distance grows) gives a factor above one.
pub fn pinch_zoom_factor(prev_distance: f64, distance: f64, sensitivity: f64) -> f64 {
    1.0 - (prev_distance - distance) * 2.0 / sensitivity
}

/// Remembers the previous pinch distance within one gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PinchTracker {
    prev_distance: Option<f64>,
}

impl PinchTracker {
    /// Feed a new distance sample. The first sample of a gesture only primes
    /// the tracker and returns `None`.
    pub fn update(&mut self, distance: f64, sensitivity: f64) -> Option<f64> {
        let zoom = self
            .prev_distance
            .map(|prev| pinch_zoom_factor(prev, distance, sensitivity));
        self.prev_distance = Some(distance);
        zoom
    }

    pub fn reset(&mut self) {
        self.prev_distance = None;
    }

    pub fn is_active(&self) -> bool {
        self.prev_distance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mouse_is_its_own_primary() {
        let input = PointerInput::mouse(3.0, 4.0);
        assert_eq!(input.primary(), Some(Point::new(3.0, 4.0)));
        assert_eq!(input.touch_count(), 1);
        assert_eq!(input.pinch(), None);
    }

    #[test]
    fn primary_prefers_surface_touch() {
        let input = PointerInput::touches([
            TouchPoint { x: 1.0, y: 1.0, on_surface: false },
            TouchPoint { x: 5.0, y: 6.0, on_surface: true },
        ]);
        assert_eq!(input.primary(), Some(Point::new(5.0, 6.0)));

        let off = PointerInput::touches([TouchPoint { x: 1.0, y: 2.0, on_surface: false }]);
        assert_eq!(off.primary(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerInput::touches([]).primary(), None);
    }

    #[test]
    fn pinch_needs_exactly_two_surface_touches() {
        let two = PointerInput::touches([TouchPoint::new(0.0, 0.0), TouchPoint::new(30.0, 40.0)]);
        assert_eq!(
            two.pinch(),
            Some(Pinch {
                distance: 70.0,
                center: Point::new(15.0, 20.0)
            })
        );

        let three = PointerInput::touches([
            TouchPoint::new(0.0, 0.0),
            TouchPoint::new(1.0, 0.0),
            TouchPoint::new(2.0, 0.0),
        ]);
        assert_eq!(three.pinch(), None);

        let one_off = PointerInput::touches([
            TouchPoint::new(0.0, 0.0),
            TouchPoint { x: 9.0, y: 9.0, on_surface: false },
        ]);
        assert_eq!(one_off.pinch(), None);
    }

    #[test]
    fn zoom_factors() {
        assert_eq!(wheel_zoom_factor(-20.0, 200.0), 1.1);
        assert_eq!(wheel_zoom_factor(0.0, 200.0), 1.0);
        assert_eq!(pinch_zoom_factor(100.0, 110.0, 200.0), 1.1);
        assert_eq!(pinch_zoom_factor(110.0, 100.0, 200.0), 0.9);
    }

    #[test]
    fn tracker_primes_on_first_sample() {
        let mut tracker = PinchTracker::default();
        assert_eq!(tracker.update(100.0, 200.0), None);
        assert!(tracker.is_active());
        assert_eq!(tracker.update(110.0, 200.0), Some(1.1));
        tracker.reset();
        assert_eq!(tracker.update(50.0, 200.0), None);
    }
}
