//! Error type shared by every layer operation.

use thiserror::Error;

/// Errors that can occur while operating a [`RasterLayer`](super::RasterLayer).
///
/// `ZoomRejected` and `TranslateRejected` are not failures in the usual sense:
/// the request fell outside the allowed bounds and the layer was left exactly
/// as it was. Use [`LayerError::is_rejection`] to tell them apart.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("No drawable surface available for layer '{name}': {reason}")]
    SurfaceUnavailable { name: String, reason: String },

    #[error("Layer '{0}' has not been initialised")]
    NotInitialised(String),

    #[error("Layer '{0}' is already bound to a surface")]
    AlreadyInitialised(String),

    #[error("Zoom ({zoom_x:.3}, {zoom_y:.3}) is outside the allowed range")]
    ZoomRejected { zoom_x: f64, zoom_y: f64 },

    #[error("Origin ({origin_x:.1}, {origin_y:.1}) would pan the content out of view")]
    TranslateRejected { origin_x: f64, origin_y: f64 },

    #[error("Pixel buffer is {actual_width}x{actual_height}, layer expects {width}x{height}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Invalid pixel data: {0}")]
    InvalidPixelData(String),

    #[error("Cairo drawing error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG stream error: {0}")]
    Png(#[from] cairo::IoError),
}

impl LayerError {
    /// Returns `true` for bound violations that leave the layer untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LayerError::ZoomRejected { .. } | LayerError::TranslateRejected { .. }
        )
    }
}
