//! Raw ARGB32 pixel storage, decoupled from any drawing surface.

use super::error::LayerError;
use cairo::{Context, Format, ImageSurface, Operator};
use std::io::{Read, Write};

/// Pixel content of a layer.
///
/// Pixels are Cairo `ARgb32`: one native-endian `u32` per pixel holding
/// premultiplied alpha, red, green and blue. Rows are `stride` bytes apart.
/// A buffer is never edited in place; layers swap in a new one instead.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Result<Self, LayerError> {
        let stride = stride_for(width)?;
        Ok(Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        })
    }

    /// Wraps caller-supplied ARGB32 bytes.
    ///
    /// # Errors
    /// [`LayerError::InvalidPixelData`] if `stride` is shorter than a row or
    /// `data` does not hold exactly `stride * height` bytes.
    pub fn from_argb32(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, LayerError> {
        if stride < width as usize * 4 {
            return Err(LayerError::InvalidPixelData(format!(
                "stride {stride} is too small for width {width}"
            )));
        }
        if stride % 4 != 0 {
            return Err(LayerError::InvalidPixelData(format!(
                "stride {stride} is not a multiple of 4"
            )));
        }
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(LayerError::InvalidPixelData(format!(
                "expected {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Copies the current content of an image surface.
    ///
    /// Surfaces in formats other than `ARgb32` are converted first.
    pub fn from_surface(surface: &ImageSurface) -> Result<Self, LayerError> {
        if surface.format() != Format::ARgb32 {
            let converted =
                ImageSurface::create(Format::ARgb32, surface.width(), surface.height())?;
            {
                let ctx = Context::new(&converted)?;
                ctx.set_operator(Operator::Source);
                ctx.set_source_surface(surface, 0.0, 0.0)?;
                ctx.paint()?;
            }
            return Self::from_surface(&converted);
        }

        let mut data = Vec::new();
        surface.with_data(|bytes| data.extend_from_slice(bytes))?;
        Self::from_argb32(
            surface.width() as u32,
            surface.height() as u32,
            surface.stride() as usize,
            data,
        )
    }

    /// Decodes a PNG stream.
    pub fn from_png<R: Read>(reader: &mut R) -> Result<Self, LayerError> {
        let surface = ImageSurface::create_from_png(reader)?;
        Self::from_surface(&surface)
    }

    /// Renders the buffer into a fresh image surface of the same size.
    pub fn to_surface(&self) -> Result<ImageSurface, LayerError> {
        let surface = ImageSurface::create_for_data(
            self.data.clone(),
            Format::ARgb32,
            self.width as i32,
            self.height as i32,
            self.stride as i32,
        )?;
        Ok(surface)
    }

    /// Encodes the buffer as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), LayerError> {
        self.to_surface()?.write_to_png(writer)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the premultiplied `0xAARRGGBB` value at `(x, y)`.
    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * 4;
        let bytes = self.data.get(offset..offset + 4)?;
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Returns `true` if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        (0..self.height).all(|y| {
            let row = y as usize * self.stride;
            self.data[row..row + self.width as usize * 4]
                .iter()
                .all(|byte| *byte == 0)
        })
    }
}

fn stride_for(width: u32) -> Result<usize, LayerError> {
    let stride = Format::ARgb32.stride_for_width(width)?;
    Ok(stride as usize)
}
