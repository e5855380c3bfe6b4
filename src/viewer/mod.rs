//! Two-layer viewer: an image layer with an annotation layer stacked on top.
//!
//! The viewer keeps both layers under the same transform, turns pointer input
//! into zoom/pan requests, and flattens the annotation into the image on demand.

pub mod events;
pub mod ops;


pub use events::{MouseButton, ScrollDirection};
pub use ops::ViewOp;

use crate::config::Config;
use crate::draw::Color;
use crate::layer::{LayerError, PixelBuffer, RasterLayer};
use crate::util;
use cairo::{Context, Format, ImageSurface};
use log::debug;

/// Name of the bottom layer.
pub const IMAGE_LAYER: &str = "image";

/// Name of the top layer.
pub const ANNOTATION_LAYER: &str = "annotation";

/// Pointer drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    last_x: f64,
    last_y: f64,
}

/// Image + annotation layer pair driven by pointer input.
pub struct Viewer {
    image: RasterLayer,
    annotation: RasterLayer,
    zoom_step: f64,
    annotation_visible: bool,
    line_color: Color,
    drag: Option<Drag>,
}

impl Viewer {
    /// Creates an uninitialised viewer using the viewer and layer settings of `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_layers(
            config,
            RasterLayer::new(IMAGE_LAYER),
            RasterLayer::new(ANNOTATION_LAYER),
        )
    }

    /// Creates a viewer around caller-constructed layers.
    pub fn with_layers(config: &Config, image: RasterLayer, annotation: RasterLayer) -> Self {
        Self {
            image,
            annotation,
            zoom_step: config.viewer.zoom_step,
            annotation_visible: config.viewer.annotation_visible,
            line_color: config.layer.line_color.to_color(),
            drag: None,
        }
    }

    /// Binds both layers to `width` x `height` surfaces and aligns the
    /// annotation layer on the image layer.
    ///
    /// Either both layers end up bound or neither does, so a failed call can
    /// be retried.
    pub fn initialise(&mut self, width: i32, height: i32) -> Result<(), LayerError> {
        self.image.initialise(width, height)?;
        if let Err(e) = self.annotation.initialise(width, height) {
            self.image.release();
            return Err(e);
        }
        self.annotation.align(&self.image)?;
        self.annotation.set_line_color(self.line_color)?;
        self.annotation.set_style_display(self.annotation_visible)?;
        debug!(
            "Viewer initialised at {width}x{height} (annotation color {})",
            util::color_to_name(&self.line_color)
        );
        Ok(())
    }

    pub fn image(&self) -> &RasterLayer {
        &self.image
    }

    pub fn annotation(&self) -> &RasterLayer {
        &self.annotation
    }

    /// Replaces the image layer content and redraws it.
    pub fn load_image(&mut self, buffer: PixelBuffer) -> Result<(), LayerError> {
        self.image.set_image_data(buffer)?;
        self.image.draw()
    }

    /// Replaces the annotation layer content and redraws it.
    pub fn load_annotation(&mut self, buffer: PixelBuffer) -> Result<(), LayerError> {
        self.annotation.set_image_data(buffer)?;
        self.annotation.draw()
    }

    /// Redraws both layers.
    pub fn draw(&mut self) -> Result<(), LayerError> {
        self.image.draw()?;
        self.annotation.draw()
    }

    /// Zooms both layers around `(center_x, center_y)` and redraws them.
    ///
    /// Both layers share a transform, so they accept or reject together; a
    /// rejection is returned after redrawing.
    pub fn zoom(
        &mut self,
        step_x: f64,
        step_y: f64,
        center_x: f64,
        center_y: f64,
    ) -> Result<(), LayerError> {
        let outcome = self.image.zoom(step_x, step_y, center_x, center_y);
        if outcome.as_ref().is_err_and(|e| !e.is_rejection()) {
            return outcome;
        }
        let annotation = self.annotation.zoom(step_x, step_y, center_x, center_y);
        if let Err(e) = annotation
            && !e.is_rejection()
        {
            return Err(e);
        }
        outcome
    }

    /// Pans both layers and redraws them.
    pub fn translate(&mut self, tx: f64, ty: f64) -> Result<(), LayerError> {
        let outcome = self.image.translate(tx, ty);
        if outcome.as_ref().is_err_and(|e| !e.is_rejection()) {
            return outcome;
        }
        let annotation = self.annotation.translate(tx, ty);
        if let Err(e) = annotation
            && !e.is_rejection()
        {
            return Err(e);
        }
        outcome
    }

    /// Resets both layers to the identity transform and redraws them.
    pub fn reset_layout(&mut self) -> Result<(), LayerError> {
        self.image.reset_layout();
        self.annotation.reset_layout();
        self.draw()
    }

    /// Shows or hides the annotation layer.
    pub fn set_annotation_visible(&mut self, visible: bool) -> Result<(), LayerError> {
        self.annotation_visible = visible;
        self.annotation.set_style_display(visible)
    }

    /// Applies one scripted operation.
    pub fn apply(&mut self, op: ViewOp) -> Result<(), LayerError> {
        debug!("Applying view operation {op}");
        match op {
            ViewOp::Zoom {
                step_x,
                step_y,
                center_x,
                center_y,
            } => self.zoom(step_x, step_y, center_x, center_y),
            ViewOp::Pan { tx, ty } => self.translate(tx, ty),
            ViewOp::Reset => self.reset_layout(),
            ViewOp::ShowAnnotation => self.set_annotation_visible(true),
            ViewOp::HideAnnotation => self.set_annotation_visible(false),
        }
    }

    /// Processes one scroll notch at pointer position `(x, y)`.
    pub fn on_scroll(&mut self, direction: ScrollDirection, x: f64, y: f64) -> Result<(), LayerError> {
        let step = self.zoom_step * direction.zoom_sign();
        self.zoom(step, step, x, y)
    }

    /// Processes a mouse button press event.
    ///
    /// - Left: starts a pan drag at `(x, y)`
    /// - Right: cancels a drag in progress
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        match button {
            MouseButton::Left => {
                self.drag = Some(Drag {
                    last_x: x,
                    last_y: y,
                });
            }
            MouseButton::Right => {
                self.drag = None;
            }
            MouseButton::Middle => {}
        }
    }

    /// Processes pointer motion; pans by the distance moved while dragging.
    ///
    /// A rejected pan keeps the drag anchor where it was, so the pointer has
    /// to travel back into range before the view follows again.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) -> Result<(), LayerError> {
        let Some(drag) = self.drag else {
            return Ok(());
        };

        match self.translate(x - drag.last_x, y - drag.last_y) {
            Ok(()) => {
                self.drag = Some(Drag {
                    last_x: x,
                    last_y: y,
                });
                Ok(())
            }
            Err(e) if e.is_rejection() => {
                debug!("Drag to ({x:.1}, {y:.1}) ignored: {e}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Processes a mouse button release event; ends a left-button drag.
    pub fn on_mouse_release(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.drag = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Merges the annotation layer into the image layer.
    ///
    /// Afterwards the image holds the flattened content at identity transform
    /// and the annotation layer is empty, reset to identity as well so the
    /// two layers stay aligned.
    pub fn flatten(&mut self) -> Result<(), LayerError> {
        self.image.merge(&mut self.annotation)?;
        self.annotation.reset_layout();
        self.image.draw()?;
        self.annotation.draw()
    }

    /// Composites the visible layers, bottom to top, into one buffer.
    pub fn snapshot(&self) -> Result<PixelBuffer, LayerError> {
        let (width, height) = self.image.size()?;
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let ctx = Context::new(&surface)?;
            for layer in [&self.image, &self.annotation] {
                if !layer.is_visible()? {
                    continue;
                }
                ctx.set_source_surface(layer.surface()?, 0.0, 0.0)?;
                ctx.paint()?;
            }
        }
        PixelBuffer::from_surface(&surface)
    }
}
