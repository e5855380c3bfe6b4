//! Raster layers: a pixel buffer presented through a bounded pan/zoom
//! transform onto an owned Cairo surface.
//!
//! This module defines:
//! - [`RasterLayer`]: the public layer contract (zoom, translate, draw, merge)
//! - [`TransformState`]: origin and per-axis zoom with hard bounds
//! - [`PixelBuffer`]: raw ARGB32 content, replaced wholesale
//! - [`RenderTarget`]: the bound surface plus style and visibility state

pub mod buffer;
pub mod error;
pub mod target;
pub mod transform;


pub use buffer::PixelBuffer;
pub use error::LayerError;
pub use target::{ImageSurfaceProvider, LayerOffset, RenderTarget, SurfaceProvider};
pub use transform::{MAX_ZOOM, MIN_ZOOM, TransformState};

use crate::draw::Color;
use cairo::ImageSurface;
use log::debug;

/// Surface and content that only exist once a layer is initialised.
struct Bound {
    target: RenderTarget,
    buffer: PixelBuffer,
}

/// A named raster layer.
///
/// Construct with [`RasterLayer::new`], then call
/// [`initialise`](Self::initialise) before anything else; until then every
/// surface-touching operation returns [`LayerError::NotInitialised`].
pub struct RasterLayer {
    name: String,
    transform: TransformState,
    bound: Option<Bound>,
    provider: Box<dyn SurfaceProvider>,
}

impl RasterLayer {
    /// Creates a layer backed by in-memory image surfaces.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_provider(name, Box::new(ImageSurfaceProvider::new()))
    }

    /// Creates a layer whose surface comes from `provider`.
    pub fn with_provider(name: impl Into<String>, provider: Box<dyn SurfaceProvider>) -> Self {
        Self {
            name: name.into(),
            transform: TransformState::identity(),
            bound: None,
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn is_initialised(&self) -> bool {
        self.bound.is_some()
    }

    /// Binds a `width` x `height` surface, clears it and captures an empty
    /// pixel buffer of the same size.
    ///
    /// # Errors
    /// - [`LayerError::SurfaceUnavailable`] if the provider has no surface or
    ///   no drawing context can be created for it. The layer stays unbound.
    /// - [`LayerError::AlreadyInitialised`] if a surface is already bound.
    pub fn initialise(&mut self, width: i32, height: i32) -> Result<(), LayerError> {
        if self.bound.is_some() {
            return Err(LayerError::AlreadyInitialised(self.name.clone()));
        }

        let surface = self
            .provider
            .acquire(&self.name, width, height)
            .map_err(|reason| self.unavailable(reason))?;
        if surface.width() != width || surface.height() != height {
            return Err(self.unavailable(format!(
                "provider returned {}x{} instead of {width}x{height}",
                surface.width(),
                surface.height()
            )));
        }

        let offset = self.provider.offset(&self.name).unwrap_or_default();
        let target = RenderTarget::bind(surface, offset)
            .map_err(|e| self.unavailable(format!("no drawing context: {e}")))?;
        target.clear()?;
        let buffer = target.capture()?;

        debug!("Initialised layer '{}' at {width}x{height}", self.name);
        self.bound = Some(Bound { target, buffer });
        Ok(())
    }

    /// Drops the bound surface and content and resets the transform, leaving
    /// the layer as it was before [`initialise`](Self::initialise).
    pub fn release(&mut self) {
        if self.bound.take().is_some() {
            debug!("Released layer '{}'", self.name);
        }
        self.transform.reset();
    }

    fn unavailable(&self, reason: String) -> LayerError {
        LayerError::SurfaceUnavailable {
            name: self.name.clone(),
            reason,
        }
    }

    fn bound(&self) -> Result<&Bound, LayerError> {
        self.bound
            .as_ref()
            .ok_or_else(|| LayerError::NotInitialised(self.name.clone()))
    }

    fn bound_mut(&mut self) -> Result<&mut Bound, LayerError> {
        self.bound
            .as_mut()
            .ok_or_else(|| LayerError::NotInitialised(self.name.clone()))
    }

    /// Bound render target.
    pub fn target(&self) -> Result<&RenderTarget, LayerError> {
        Ok(&self.bound()?.target)
    }

    /// Currently rendered surface.
    pub fn surface(&self) -> Result<&ImageSurface, LayerError> {
        Ok(self.bound()?.target.surface())
    }

    /// Current pixel content.
    pub fn image_data(&self) -> Result<&PixelBuffer, LayerError> {
        Ok(&self.bound()?.buffer)
    }

    /// Target size in pixels.
    pub fn size(&self) -> Result<(i32, i32), LayerError> {
        let target = &self.bound()?.target;
        Ok((target.width(), target.height()))
    }

    /// Replaces the pixel content. Does not redraw.
    ///
    /// # Errors
    /// [`LayerError::BufferSizeMismatch`] unless `buffer` matches the target size.
    pub fn set_image_data(&mut self, buffer: PixelBuffer) -> Result<(), LayerError> {
        let bound = self.bound_mut()?;
        let width = bound.target.width() as u32;
        let height = bound.target.height() as u32;
        if buffer.width() != width || buffer.height() != height {
            return Err(LayerError::BufferSizeMismatch {
                width,
                height,
                actual_width: buffer.width(),
                actual_height: buffer.height(),
            });
        }
        bound.buffer = buffer;
        Ok(())
    }

    /// Zooms by `(step_x, step_y)` around target point `(center_x, center_y)`
    /// without redrawing.
    ///
    /// # Errors
    /// [`LayerError::ZoomRejected`] if a resulting zoom factor leaves
    /// `(MIN_ZOOM, MAX_ZOOM)` or the anchored origin is not finite; nothing
    /// changes in that case.
    pub fn set_zoom(
        &mut self,
        step_x: f64,
        step_y: f64,
        center_x: f64,
        center_y: f64,
    ) -> Result<(), LayerError> {
        self.bound()?;
        self.transform.zoom_by(step_x, step_y, center_x, center_y)
    }

    /// [`set_zoom`](Self::set_zoom) followed by a redraw.
    ///
    /// The layer is redrawn even when the zoom is rejected; the rejection is
    /// still reported afterwards.
    pub fn zoom(
        &mut self,
        step_x: f64,
        step_y: f64,
        center_x: f64,
        center_y: f64,
    ) -> Result<(), LayerError> {
        let outcome = self.set_zoom(step_x, step_y, center_x, center_y);
        self.draw()?;
        outcome
    }

    /// Pans by `(tx, ty)` without redrawing.
    ///
    /// # Errors
    /// [`LayerError::TranslateRejected`] if either axis would leave its pan
    /// bounds; neither axis moves in that case.
    pub fn set_translate(&mut self, tx: f64, ty: f64) -> Result<(), LayerError> {
        let (width, height) = self.size()?;
        self.transform
            .translate_within(tx, ty, width as f64, height as f64)
    }

    /// [`set_translate`](Self::set_translate) followed by a redraw.
    pub fn translate(&mut self, tx: f64, ty: f64) -> Result<(), LayerError> {
        let outcome = self.set_translate(tx, ty);
        self.draw()?;
        outcome
    }

    /// Back to origin (0, 0) and zoom (1, 1). Does not redraw.
    pub fn reset_layout(&mut self) {
        self.transform.reset();
    }

    /// Recomposites the pixel buffer onto the target through the transform.
    pub fn draw(&mut self) -> Result<(), LayerError> {
        let transform = self.transform;
        let bound = self.bound()?;
        let target = &bound.target;

        target.clear()?;

        // Raw pixels go to a native-resolution surface first; only that
        // surface is scaled onto the target.
        let staging = bound.buffer.to_surface()?;

        let ctx = target.context();
        ctx.save()?;
        transform.apply(ctx);
        let painted = ctx
            .set_source_surface(&staging, 0.0, 0.0)
            .and_then(|()| ctx.paint());
        ctx.restore()?;
        painted?;
        target.surface().flush();

        let (zoom_x, zoom_y) = transform.zoom();
        debug!("Drew layer '{}' at zoom {zoom_x:.2}x{zoom_y:.2}", self.name);
        Ok(())
    }

    /// Composites `other`'s rendered surface onto this layer and moves the
    /// content over: this layer's transform collapses to identity and its
    /// buffer becomes the composited result, while `other` is left empty.
    ///
    /// The source is painted at (0, 0) unscaled; aligning the two layers'
    /// geometry beforehand is up to the caller.
    pub fn merge(&mut self, other: &mut RasterLayer) -> Result<(), LayerError> {
        other.bound()?;
        self.bound()?;

        {
            let source = other.bound()?.target.surface();
            let ctx = self.bound()?.target.context();
            source.flush();
            ctx.save()?;
            ctx.set_source_surface(source, 0.0, 0.0)?;
            ctx.paint()?;
            ctx.restore()?;
        }

        self.reset_layout();

        let merged = self.bound()?.target.capture()?;
        self.bound_mut()?.buffer = merged;

        let source = other.bound_mut()?;
        source.target.clear()?;
        source.buffer = PixelBuffer::transparent(
            source.target.width() as u32,
            source.target.height() as u32,
        )?;

        debug!("Merged layer '{}' into '{}'", other.name, self.name);
        Ok(())
    }

    /// Fills the whole target with the current fill color.
    pub fn fill_context(&mut self) -> Result<(), LayerError> {
        self.bound()?.target.fill()
    }

    /// Clears the whole target.
    pub fn clear_context_rect(&mut self) -> Result<(), LayerError> {
        self.bound()?.target.clear()
    }

    /// Sets both fill and stroke color.
    pub fn set_line_color(&mut self, color: Color) -> Result<(), LayerError> {
        self.bound_mut()?.target.set_line_color(color);
        Ok(())
    }

    /// Shows or hides the layer.
    pub fn set_style_display(&mut self, visible: bool) -> Result<(), LayerError> {
        self.bound_mut()?.target.set_visible(visible);
        Ok(())
    }

    pub fn is_visible(&self) -> Result<bool, LayerError> {
        Ok(self.bound()?.target.is_visible())
    }

    /// On-page position of the layer's surface.
    pub fn get_offset(&self) -> Result<LayerOffset, LayerError> {
        Ok(self.bound()?.target.offset())
    }

    /// Moves this layer's surface to `other`'s on-page position.
    pub fn align(&mut self, other: &RasterLayer) -> Result<(), LayerError> {
        let offset = other.get_offset()?;
        self.bound_mut()?.target.set_offset(offset);
        Ok(())
    }
}
