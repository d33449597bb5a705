//! Drawing surface abstraction and its Cairo implementation.
//!
//! - [`DrawingSurface`]: the raster the gesture engine paints onto
//! - [`CairoSurface`]: ARGB32 image surface with PNG export
//! - [`StrokeStyle`] / [`Color`]: how strokes are painted

pub mod cairo_surface;
pub mod style;
pub mod surface;

pub use cairo_surface::CairoSurface;
pub use style::{Color, StrokeStyle};
pub use surface::{DrawingSurface, Point, SurfaceError};
