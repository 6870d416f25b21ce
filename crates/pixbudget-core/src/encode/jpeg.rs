//! JPEG encoding using the `image` crate's baseline encoder.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{check_pixels, EncodeError};
use crate::decode::{Bitmap, PixelFormat};
use crate::format::ImageFormat;

/// Map a `[0, 1]` quality to the encoder's 1-100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a bitmap to JPEG bytes.
///
/// JPEG has no alpha channel: RGBA bitmaps are composited over white first.
///
/// # Errors
///
/// Returns an error if the bitmap has zero dimensions, its pixel buffer is
/// the wrong length, or the codec fails.
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, EncodeError> {
    check_pixels(bitmap)?;

    let flattened;
    let rgb: &[u8] = match bitmap.format {
        PixelFormat::Rgb8 => &bitmap.pixels,
        PixelFormat::Rgba8 => {
            flattened = flatten_onto_white(&bitmap.pixels);
            &flattened
        }
    };

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn flatten_onto_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u32::from(px[3]);
        for &channel in &px[..3] {
            let blended = (u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gradient_bitmap, noise_bitmap};

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.5), 50);
        // Zero still produces a valid encoder setting
        assert_eq!(jpeg_quality(0.0), 1);
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let bytes = encode_jpeg(&gradient_bitmap(100, 100), 90).unwrap();

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        let len = bytes.len();
        assert_eq!(&bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_quality_affects_size() {
        let bitmap = noise_bitmap(64, 64, 42);

        let low = encode_jpeg(&bitmap, 50).unwrap();
        let high = encode_jpeg(&bitmap, 92).unwrap();
        assert!(high.len() > low.len(), "high={} low={}", high.len(), low.len());
    }

    #[test]
    fn test_single_pixel() {
        let bitmap = Bitmap::new(1, 1, PixelFormat::Rgb8, vec![255, 0, 0]);
        let bytes = encode_jpeg(&bitmap, 90).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_flatten_onto_white() {
        // Opaque red, transparent black, half-transparent black
        let rgba = [255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128];
        let rgb = flatten_onto_white(&rgba);

        assert_eq!(&rgb[0..3], &[255, 0, 0]);
        assert_eq!(&rgb[3..6], &[255, 255, 255]);
        assert_eq!(&rgb[6..9], &[127, 127, 127]);
    }

    #[test]
    fn test_rgba_bitmap_encodes() {
        let bitmap = Bitmap::new(4, 4, PixelFormat::Rgba8, vec![10u8; 4 * 4 * 4]);
        assert!(encode_jpeg(&bitmap, 80).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data() {
        let bitmap = Bitmap {
            width: 100,
            height: 100,
            format: PixelFormat::Rgb8,
            pixels: vec![128u8; 99 * 100 * 3],
        };
        assert!(matches!(
            encode_jpeg(&bitmap, 90),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }
}
