pub mod commands;
pub mod controller;
pub mod events;
pub mod extend;
pub mod input;
pub mod shortcuts;
pub mod tools;

pub use commands::{Action, History};
pub use controller::{ControllerOptions, ViewportController};
pub use events::{DataChange, ListenerId, StrokeEnd};
pub use input::{InputEvent, Modifiers, PointerInput, TouchPoint, WheelInput};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::Brush;
