//! Core types for image decoding.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::ImageFormat;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream was empty.
    #[error("Image file is empty")]
    Empty,

    /// The leading signature does not match the declared format.
    #[error("File contents are not a valid {expected} image")]
    FormatMismatch { expected: ImageFormat },

    /// The container ends before its terminating marker.
    #[error("Truncated image file: {0}")]
    Truncated(String),

    /// The image file is corrupted.
    #[error("Corrupted image file: {0}")]
    CorruptedFile(String),

    /// The image has more pixels than the configured ceiling.
    #[error("Image is too large: {width}x{height} exceeds {limit} pixels")]
    TooLarge { width: u32, height: u32, limit: u64 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Channel layout of a [`Bitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 bytes per pixel.
    Rgb8,
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// A decoded, uncompressed pixel grid.
///
/// The budget search never mutates a `Bitmap`; every attempt derives a new
/// (possibly resized) copy from the native one.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub format: PixelFormat,
    /// Row-major pixel data; length is `width * height * format.channels()`.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * format.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    /// Build from a decoded image, keeping an alpha channel only when present.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            let rgba = img.into_rgba8();
            let (width, height) = rgba.dimensions();
            Self::new(width, height, PixelFormat::Rgba8, rgba.into_raw())
        } else {
            let rgb = img.into_rgb8();
            let (width, height) = rgb.dimensions();
            Self::new(width, height, PixelFormat::Rgb8, rgb.into_raw())
        }
    }

    /// Convert to a `DynamicImage` for resampling or encoding.
    ///
    /// Returns `None` if the pixel buffer does not match the dimensions.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let pixels = self.pixels.clone();
        match self.format {
            PixelFormat::Rgb8 => {
                image::RgbImage::from_raw(self.width, self.height, pixels).map(DynamicImage::ImageRgb8)
            }
            PixelFormat::Rgba8 => image::RgbaImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageRgba8),
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Expected pixel buffer length for the current dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.channels()
    }

    pub fn has_alpha(&self) -> bool {
        self.format == PixelFormat::Rgba8
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_bitmap_rgb() {
        let bitmap = Bitmap::new(100, 50, PixelFormat::Rgb8, vec![0u8; 100 * 50 * 3]);
        assert_eq!(bitmap.pixel_count(), 5000);
        assert_eq!(bitmap.expected_len(), 15000);
        assert!(!bitmap.has_alpha());
        assert!(!bitmap.is_empty());
    }

    #[test]
    fn test_bitmap_rgba() {
        let bitmap = Bitmap::new(10, 10, PixelFormat::Rgba8, vec![0u8; 10 * 10 * 4]);
        assert!(bitmap.has_alpha());
        assert_eq!(bitmap.expected_len(), 400);
    }

    #[test]
    fn test_bitmap_empty() {
        let bitmap = Bitmap::new(0, 0, PixelFormat::Rgb8, vec![]);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_from_dynamic_keeps_alpha_only_when_present() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2));
        let bitmap = Bitmap::from_dynamic(rgba);
        assert_eq!(bitmap.format, PixelFormat::Rgba8);
        assert_eq!(bitmap.pixels.len(), 4 * 2 * 4);

        let luma = DynamicImage::ImageLuma8(image::GrayImage::new(4, 2));
        let bitmap = Bitmap::from_dynamic(luma);
        assert_eq!(bitmap.format, PixelFormat::Rgb8);
        assert_eq!(bitmap.pixels.len(), 4 * 2 * 3);
    }

    #[test]
    fn test_to_dynamic_round_trip_dimensions() {
        let bitmap = Bitmap::new(3, 2, PixelFormat::Rgb8, vec![7u8; 3 * 2 * 3]);
        let img = bitmap.to_dynamic().unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(Bitmap::from_dynamic(img), bitmap);
    }

    #[test]
    fn test_to_dynamic_rejects_short_buffer() {
        let bitmap = Bitmap {
            width: 3,
            height: 2,
            format: PixelFormat::Rgba8,
            pixels: vec![0u8; 5],
        };
        assert!(bitmap.to_dynamic().is_none());
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::FormatMismatch {
            expected: ImageFormat::Png,
        };
        assert_eq!(err.to_string(), "File contents are not a valid PNG image");

        let err = DecodeError::TooLarge {
            width: 10,
            height: 10,
            limit: 50,
        };
        assert_eq!(err.to_string(), "Image is too large: 10x10 exceeds 50 pixels");
    }
}
