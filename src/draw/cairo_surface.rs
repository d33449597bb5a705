//! Cairo-backed [`DrawingSurface`].

use super::style::{Color, StrokeStyle};
use super::surface::{DrawingSurface, Point, SurfaceError};
use cairo::{Context, Format, ImageSurface};

/// ARGB32 image surface holding the air-drawn strokes.
///
/// A fresh Cairo context is created for every operation so the surface stays
/// uniquely owned and its pixel data can be borrowed between frames.
pub struct CairoSurface {
    surface: ImageSurface,
    width: u32,
    height: u32,
    /// Solid fill placed behind the strokes on export (`None` keeps alpha)
    export_background: Option<Color>,
}

impl CairoSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)
            .map_err(|e| SurfaceError::Create(e.to_string()))?;
        log::debug!("Created {}x{} drawing surface", width, height);
        Ok(Self {
            surface,
            width,
            height,
            export_background: None,
        })
    }

    pub fn with_export_background(mut self, background: Option<Color>) -> Self {
        self.export_background = background;
        self
    }

    fn context(&self) -> Option<Context> {
        match Context::new(&self.surface) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("Failed to create drawing context: {}", e);
                None
            }
        }
    }

    /// Alpha value of the pixel at (x, y), or `None` when out of bounds.
    #[cfg(test)]
    fn alpha_at(&mut self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let data = self.surface.data().ok()?;
        let offset = y as usize * stride + x as usize * 4;
        let pixel = u32::from_ne_bytes(data.get(offset..offset + 4)?.try_into().ok()?);
        Some((pixel >> 24) as u8)
    }

    /// Number of pixels with any coverage at all.
    #[cfg(test)]
    fn painted_pixels(&mut self) -> usize {
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let (width, height) = (self.width as usize, self.height as usize);
        let Ok(data) = self.surface.data() else {
            return 0;
        };
        (0..height)
            .map(|y| {
                data[y * stride..y * stride + width * 4]
                    .chunks_exact(4)
                    .filter(|px| u32::from_ne_bytes([px[0], px[1], px[2], px[3]]) >> 24 != 0)
                    .count()
            })
            .sum()
    }
}

impl DrawingSurface for CairoSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let Some(ctx) = self.context() else {
            return;
        };
        let color = style.color;
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.set_line_width(style.width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        let _ = ctx.stroke();
    }

    fn erase_disc(&mut self, center: Point, radius: f64) {
        let Some(ctx) = self.context() else {
            return;
        };
        // Clear, not paint-over: the canvas background is transparent
        ctx.set_operator(cairo::Operator::Clear);
        ctx.arc(center.x, center.y, radius.max(1.0), 0.0, std::f64::consts::PI * 2.0);
        let _ = ctx.fill();
    }

    fn clear(&mut self) {
        let Some(ctx) = self.context() else {
            return;
        };
        ctx.set_operator(cairo::Operator::Clear);
        let _ = ctx.paint();
    }

    fn export_image(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut buffer = Vec::new();
        match self.export_background {
            None => {
                self.surface
                    .write_to_png(&mut buffer)
                    .map_err(|e| SurfaceError::Encode(e.to_string()))?;
            }
            Some(bg) => {
                let composed =
                    ImageSurface::create(Format::ARgb32, self.width as i32, self.height as i32)
                        .map_err(|e| SurfaceError::Create(e.to_string()))?;
                {
                    let ctx =
                        Context::new(&composed).map_err(|e| SurfaceError::Create(e.to_string()))?;
                    ctx.set_source_rgba(bg.r, bg.g, bg.b, bg.a);
                    ctx.paint().map_err(|e| SurfaceError::Encode(e.to_string()))?;
                    ctx.set_source_surface(&self.surface, 0.0, 0.0)
                        .map_err(|e| SurfaceError::Encode(e.to_string()))?;
                    ctx.paint().map_err(|e| SurfaceError::Encode(e.to_string()))?;
                }
                composed
                    .write_to_png(&mut buffer)
                    .map_err(|e| SurfaceError::Encode(e.to_string()))?;
            }
        }
        Ok(buffer)
    }
}
