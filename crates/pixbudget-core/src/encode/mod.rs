//! Image encoding for the budget search.
//!
//! Each format exposes one fidelity lever driven by `EncodeParams::quality`:
//! - JPEG: the encoder's quality setting (`round(q * 100)`)
//! - PNG: bits per color channel (`ceil(q * 8)`), posterized before deflate
//!
//! Both levers are monotonic in expectation: a higher quality never yields a
//! smaller file for the same pixels. Encoding is deterministic.

mod jpeg;
mod png;

use thiserror::Error;

use crate::decode::{self, Bitmap, FilterType};
use crate::format::ImageFormat;

pub use jpeg::{encode_jpeg, jpeg_quality};
pub use png::{encode_png, png_channel_bits};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality outside `[0, 1]` or not a number
    #[error("Invalid quality {0}: must be within [0, 1]")]
    InvalidQuality(f32),

    /// Resampling to the target dimensions failed
    #[error("Resize failed: {0}")]
    ResizeFailed(String),

    /// The underlying codec failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed { format: ImageFormat, message: String },
}

/// Parameters for a single encoder invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeParams {
    pub format: ImageFormat,
    /// Fidelity lever in `[0, 1]`.
    pub quality: f32,
    /// Target width; the bitmap is resampled when this differs.
    pub width: u32,
    /// Target height; the bitmap is resampled when this differs.
    pub height: u32,
}

impl EncodeParams {
    fn validate(&self) -> Result<(), EncodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(EncodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(EncodeError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

/// Encode `bitmap` with `params`, resampling with `filter` when needed.
///
/// The input bitmap is never modified.
///
/// # Errors
///
/// Returns an error for zero dimensions, out-of-range quality, a pixel
/// buffer that does not match the bitmap's dimensions, or a codec failure.
pub fn encode(
    bitmap: &Bitmap,
    params: &EncodeParams,
    filter: FilterType,
) -> Result<Vec<u8>, EncodeError> {
    params.validate()?;
    check_pixels(bitmap)?;

    let resized;
    let source = if bitmap.width == params.width && bitmap.height == params.height {
        bitmap
    } else {
        resized = decode::resize(bitmap, params.width, params.height, filter)
            .map_err(|e| EncodeError::ResizeFailed(e.to_string()))?;
        &resized
    };

    match params.format {
        ImageFormat::Jpeg => encode_jpeg(source, jpeg_quality(params.quality)),
        ImageFormat::Png => encode_png(source, png_channel_bits(params.quality)),
    }
}

pub(crate) fn check_pixels(bitmap: &Bitmap) -> Result<(), EncodeError> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }
    let expected = bitmap.expected_len();
    if bitmap.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: bitmap.pixels.len(),
        });
    }
    Ok(())
}
