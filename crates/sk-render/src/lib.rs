pub mod hit;
pub mod paint;
pub mod raster;
#[cfg(feature = "scene")]
pub mod scene;
pub mod surface;

pub use hit::{detect_handle, handle_thickness, region_contains};
pub use paint::{CanvasTheme, Frame, render_frame, render_region};
pub use raster::RasterSurface;
#[cfg(feature = "scene")]
pub use scene::SceneSurface;
pub use surface::{ScreenRect, Surface};
