pub mod config;
pub mod id;
pub mod model;
pub mod transform;

pub use config::ViewportConfig;
pub use id::StrokeId;
pub use model::*;
pub use transform::{clamp_offset, clamp_scale, screen_to_world, world_to_screen};
