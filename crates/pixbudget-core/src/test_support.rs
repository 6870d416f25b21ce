//! Synthetic fixtures shared by unit tests.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::decode::{Bitmap, PixelFormat};

/// Smooth RGB gradient; compresses well.
pub(crate) fn gradient_bitmap(width: u32, height: u32) -> Bitmap {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
        }
    }
    Bitmap::new(width, height, PixelFormat::Rgb8, pixels)
}

/// Deterministic pseudo-random RGB noise; compresses badly.
pub(crate) fn noise_bitmap(width: u32, height: u32, seed: u64) -> Bitmap {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let len = (width * height * 3) as usize;
    let pixels = (0..len)
        .map(|_| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect();
    Bitmap::new(width, height, PixelFormat::Rgb8, pixels)
}

/// Gradient with a horizontal alpha ramp.
pub(crate) fn rgba_bitmap(width: u32, height: u32) -> Bitmap {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(64);
            pixels.push(((x * 255) / width.max(1)) as u8);
        }
    }
    Bitmap::new(width, height, PixelFormat::Rgba8, pixels)
}

/// Encode an RGB bitmap as a JPEG file.
pub(crate) fn jpeg_fixture(bitmap: &Bitmap, quality: u8) -> Vec<u8> {
    assert_eq!(bitmap.format, PixelFormat::Rgb8, "JPEG fixtures are RGB");
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&bitmap.pixels, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer.into_inner()
}

/// Encode a bitmap losslessly as a PNG file.
pub(crate) fn png_fixture(bitmap: &Bitmap) -> Vec<u8> {
    let color = match bitmap.format {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
    };
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&bitmap.pixels, bitmap.width, bitmap.height, color)
        .unwrap();
    buffer.into_inner()
}
