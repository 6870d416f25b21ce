//! PNG encoding with bit-depth reduction as the size lever.
//!
//! PNG has no quality knob. Quantizing each color channel to fewer levels
//! makes runs and repeated rows far more common, which is what deflate feeds
//! on. The stream stays an ordinary 8-bit RGB(A) PNG.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::{check_pixels, EncodeError};
use crate::decode::{Bitmap, PixelFormat};
use crate::format::ImageFormat;

/// Map a `[0, 1]` quality to bits per color channel (1-8).
pub fn png_channel_bits(quality: f32) -> u8 {
    (quality * 8.0).ceil().clamp(1.0, 8.0) as u8
}

/// Encode a bitmap to PNG, posterizing color channels to `bits` per channel.
///
/// Alpha is never quantized. `bits >= 8` is lossless.
///
/// # Errors
///
/// Returns an error if the bitmap has zero dimensions, its pixel buffer is
/// the wrong length, or the codec fails.
pub fn encode_png(bitmap: &Bitmap, bits: u8) -> Result<Vec<u8>, EncodeError> {
    check_pixels(bitmap)?;

    let posterized;
    let pixels: &[u8] = if bits >= 8 {
        &bitmap.pixels
    } else {
        posterized = posterize(&bitmap.pixels, bitmap.format, bits.max(1));
        &posterized
    };

    let color = match bitmap.format {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
    };

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive)
        .write_image(pixels, bitmap.width, bitmap.height, color)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn posterize(pixels: &[u8], format: PixelFormat, bits: u8) -> Vec<u8> {
    let levels = (1u32 << bits) - 1;
    let table: Vec<u8> = (0..=255u32)
        .map(|v| {
            let level = (v * levels + 127) / 255;
            ((level * 255 + levels / 2) / levels) as u8
        })
        .collect();

    let channels = format.channels();
    pixels
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            // Alpha is the 4th channel of RGBA
            if channels == 4 && i % 4 == 3 {
                v
            } else {
                table[v as usize]
            }
        })
        .collect()
}
