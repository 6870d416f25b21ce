//! Image decoding for the compression pipeline.
//!
//! This module provides functionality for:
//! - Validating that bytes match their declared format (magic bytes)
//! - Rejecting truncated containers before pixel decoding starts
//! - Decoding PNG and JPEG into a [`Bitmap`]
//! - Resampling bitmaps for the budget search

mod jpeg;
mod png;
mod resize;
mod types;

use std::io::Cursor;

use image::{DynamicImage, ImageReader};

use crate::format::ImageFormat;

pub use jpeg::decode_jpeg;
pub use png::decode_png;
pub use resize::{halved_dimensions, max_halvings, resize};
pub use types::{Bitmap, DecodeError, FilterType, Orientation, PixelFormat};

/// Decode `bytes` as the declared `format`.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for no input, `DecodeError::FormatMismatch`
/// when the signature does not match `format`, and the format decoder's
/// error otherwise.
pub fn decode(bytes: &[u8], format: ImageFormat, max_pixels: u64) -> Result<Bitmap, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if !format.matches_magic(bytes) {
        return Err(DecodeError::FormatMismatch { expected: format });
    }

    let bitmap = match format {
        ImageFormat::Png => decode_png(bytes, max_pixels)?,
        ImageFormat::Jpeg => decode_jpeg(bytes, max_pixels)?,
    };

    log::debug!(
        "Decoded {} source: {}x{} {:?}",
        format,
        bitmap.width,
        bitmap.height,
        bitmap.format
    );
    Ok(bitmap)
}

/// Check header dimensions against `max_pixels`, then decode fully.
pub(crate) fn read_image(
    bytes: &[u8],
    format: ImageFormat,
    max_pixels: u64,
) -> Result<DynamicImage, DecodeError> {
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if width as u64 * height as u64 > max_pixels {
        return Err(DecodeError::TooLarge {
            width,
            height,
            limit: max_pixels,
        });
    }

    ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}
