//! Library exports for rasterlayer.
//!
//! Exposes the raster layer model alongside the viewer, configuration and
//! export helpers built on it, so that embedding applications can drive the
//! same layers the command-line tool uses.

pub mod config;
pub mod draw;
pub mod export;
pub mod layer;
pub mod notification;
pub mod util;
pub mod viewer;

pub use config::Config;
pub use layer::{LayerError, PixelBuffer, RasterLayer, TransformState};
pub use viewer::Viewer;
