//! Resampling and scale-ladder dimension math.
//!
//! All functions return new values without modifying the input bitmap.

use super::{Bitmap, DecodeError, FilterType};

/// Resize a bitmap to exact dimensions, keeping its pixel format.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if a target dimension is zero or the
/// bitmap's pixel buffer does not match its dimensions.
pub fn resize(
    bitmap: &Bitmap,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Bitmap, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::CorruptedFile(format!(
            "cannot resize to {width}x{height}"
        )));
    }

    // Fast path: if dimensions match, just clone
    if bitmap.width == width && bitmap.height == height {
        return Ok(bitmap.clone());
    }

    let img = bitmap.to_dynamic().ok_or_else(|| {
        DecodeError::CorruptedFile("pixel buffer does not match dimensions".to_string())
    })?;

    // resize_exact keeps the channel layout, so the pixel format survives
    let resized = img.resize_exact(width, height, filter.to_image_filter());
    Ok(Bitmap::from_dynamic(resized))
}

/// Dimensions after halving both edges `shift` times, preserving aspect ratio.
///
/// Each edge is rounded to the nearest pixel and never drops below 1.
pub fn halved_dimensions(width: u32, height: u32, shift: u32) -> (u32, u32) {
    (halve(width, shift), halve(height, shift))
}

/// Largest number of halvings that keeps the longer edge at or above
/// `min_edge`. The shorter edge may fall below it, down to 1 pixel, so very
/// wide or tall images still shrink. Images whose longer edge is already
/// under `min_edge` cannot be halved.
pub fn max_halvings(width: u32, height: u32, min_edge: u32) -> u32 {
    let long = width.max(height);
    let mut shift = 0;
    while shift < 31 && halve(long, shift + 1) >= min_edge {
        shift += 1;
    }
    shift
}

fn halve(edge: u32, shift: u32) -> u32 {
    let scaled = (edge as f64 / f64::from(1u32 << shift.min(31))).round() as u32;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PixelFormat;
    use crate::test_support::gradient_bitmap;

    #[test]
    fn test_resize_basic() {
        let bitmap = gradient_bitmap(100, 50);
        let resized = resize(&bitmap, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions() {
        let bitmap = gradient_bitmap(100, 50);
        let resized = resize(&bitmap, 100, 50, FilterType::Lanczos3).unwrap();
        assert_eq!(resized, bitmap);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let bitmap = gradient_bitmap(100, 50);

        assert!(resize(&bitmap, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&bitmap, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_keeps_rgba() {
        let bitmap = Bitmap::new(8, 8, PixelFormat::Rgba8, vec![200u8; 8 * 8 * 4]);
        let resized = resize(&bitmap, 4, 4, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.format, PixelFormat::Rgba8);
        assert_eq!(resized.pixels.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_all_filter_types() {
        let bitmap = gradient_bitmap(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&bitmap, 50, 25, filter).unwrap();
            assert_eq!((resized.width, resized.height), (50, 25));
        }
    }

    #[test]
    fn test_halved_dimensions() {
        assert_eq!(halved_dimensions(100, 50, 0), (100, 50));
        assert_eq!(halved_dimensions(100, 50, 1), (50, 25));
        assert_eq!(halved_dimensions(4000, 3000, 3), (500, 375));
        // Never collapses to zero
        assert_eq!(halved_dimensions(3, 1, 4), (1, 1));
    }

    #[test]
    fn test_halved_dimensions_preserve_aspect() {
        let (w, h) = halved_dimensions(1600, 900, 2);
        assert_eq!((w, h), (400, 225));
        assert!(((w as f64 / h as f64) - 16.0 / 9.0).abs() < 0.01);
    }

    #[test]
    fn test_max_halvings() {
        assert_eq!(max_halvings(512, 512, 16), 5);
        assert_eq!(max_halvings(40, 40, 16), 1);
        assert_eq!(max_halvings(4000, 3000, 16), 8);
        // Longer edge decides
        assert_eq!(max_halvings(1000, 16, 16), 6);
        assert_eq!(max_halvings(15, 100, 16), 2);
        // Already below the minimum
        assert_eq!(max_halvings(15, 10, 16), 0);
    }

    #[test]
    fn test_extreme_aspect_shrinks_to_a_sliver() {
        let shift = max_halvings(4000, 16, 16);
        assert_eq!(shift, 8);
        assert_eq!(halved_dimensions(4000, 16, shift), (16, 1));
        assert_eq!(halved_dimensions(16, 4000, shift), (1, 16));
    }
}
