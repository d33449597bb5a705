//! The raster the gesture engine paints on.

use super::style::StrokeStyle;
use thiserror::Error;

/// Pixel-space coordinate on a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Errors raised by a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Failed to create surface: {0}")]
    Create(String),

    #[error("Failed to encode surface as PNG: {0}")]
    Encode(String),
}

/// Persistent 2D raster that accumulates strokes.
///
/// The engine only appends strokes, erases discs, and clears; reading pixels
/// back happens through [`DrawingSurface::export_image`].
pub trait DrawingSurface {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Paints a straight segment from `from` to `to`.
    fn draw_line(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Makes a filled disc fully transparent.
    fn erase_disc(&mut self, center: Point, radius: f64);

    /// Wipes the whole surface back to transparent.
    fn clear(&mut self);

    /// Encodes the current contents as PNG bytes.
    fn export_image(&self) -> Result<Vec<u8>, SurfaceError>;
}
