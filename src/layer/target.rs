//! Drawable surfaces backing a layer and the collaborator that provides them.

use super::error::LayerError;
use crate::draw::{Color, RED};
use cairo::{Context, Format, ImageSurface, Operator};
use log::debug;

/// Largest edge Cairo image surfaces accept.
pub const MAX_SURFACE_DIMENSION: i32 = 32767;

/// Position of a surface relative to the page/window it is laid out on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerOffset {
    pub top: f64,
    pub left: f64,
}

/// Locates or creates the backing surface for a named layer.
pub trait SurfaceProvider {
    /// Returns a surface of exactly `width` x `height` pixels for `name`.
    ///
    /// The error string is surfaced to callers as the reason in
    /// [`LayerError::SurfaceUnavailable`].
    fn acquire(&mut self, name: &str, width: i32, height: i32) -> Result<ImageSurface, String>;

    /// On-page position of the surface for `name`, if the provider knows it.
    fn offset(&self, _name: &str) -> Option<LayerOffset> {
        None
    }
}

/// Provider backed by in-memory Cairo image surfaces.
#[derive(Debug, Clone)]
pub struct ImageSurfaceProvider {
    max_dimension: i32,
}

impl ImageSurfaceProvider {
    pub fn new() -> Self {
        Self {
            max_dimension: MAX_SURFACE_DIMENSION,
        }
    }

    /// Limits surface edges to `max_dimension` pixels (capped at Cairo's limit).
    pub fn with_max_dimension(max_dimension: i32) -> Self {
        Self {
            max_dimension: max_dimension.min(MAX_SURFACE_DIMENSION),
        }
    }
}

impl Default for ImageSurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceProvider for ImageSurfaceProvider {
    fn acquire(&mut self, name: &str, width: i32, height: i32) -> Result<ImageSurface, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("invalid surface size {width}x{height}"));
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(format!(
                "surface size {width}x{height} exceeds {} pixels",
                self.max_dimension
            ));
        }
        debug!("Creating {width}x{height} image surface for '{name}'");
        ImageSurface::create(Format::ARgb32, width, height).map_err(|e| e.to_string())
    }
}

/// The drawable surface a layer presents onto, with its drawing context and
/// the style/visibility/placement state callers toggle on it.
pub struct RenderTarget {
    surface: ImageSurface,
    ctx: Context,
    fill: Color,
    stroke: Color,
    visible: bool,
    offset: LayerOffset,
}

impl RenderTarget {
    /// Binds a surface and creates its drawing context.
    pub fn bind(surface: ImageSurface, offset: LayerOffset) -> Result<Self, cairo::Error> {
        let ctx = Context::new(&surface)?;
        Ok(Self {
            surface,
            ctx,
            fill: RED,
            stroke: RED,
            visible: true,
            offset,
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Clears every pixel to transparent.
    pub fn clear(&self) -> Result<(), LayerError> {
        self.ctx.save()?;
        self.ctx.set_operator(Operator::Clear);
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }

    /// Fills the whole surface with the current fill color.
    pub fn fill(&self) -> Result<(), LayerError> {
        let Color { r, g, b, a } = self.fill;
        self.ctx.save()?;
        self.ctx.set_source_rgba(r, g, b, a);
        self.ctx
            .rectangle(0.0, 0.0, self.width() as f64, self.height() as f64);
        self.ctx.fill()?;
        self.ctx.restore()?;
        Ok(())
    }

    /// Snapshot of the surface as a pixel buffer.
    pub fn capture(&self) -> Result<super::PixelBuffer, LayerError> {
        self.surface.flush();
        super::PixelBuffer::from_surface(&self.surface)
    }

    /// Sets both fill and stroke color.
    pub fn set_line_color(&mut self, color: Color) {
        self.fill = color;
        self.stroke = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn offset(&self) -> LayerOffset {
        self.offset
    }

    pub fn set_offset(&mut self, offset: LayerOffset) {
        self.offset = offset;
    }
}
