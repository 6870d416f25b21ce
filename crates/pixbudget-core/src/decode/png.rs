//! PNG decoding with a chunk-level completeness check.

use super::{read_image, Bitmap, DecodeError};
use crate::format::ImageFormat;

const SIGNATURE_LEN: usize = 8;
const IEND: &[u8; 4] = b"IEND";

/// Decode a PNG image from bytes.
///
/// Palette, grayscale and 16-bit sources are normalised to 8-bit RGB, or
/// RGBA when the source carries transparency.
///
/// # Errors
///
/// Returns `DecodeError::Truncated` if the chunk stream ends before `IEND`,
/// `DecodeError::CorruptedFile` if the image data fails to decode, and
/// `DecodeError::TooLarge` if the header dimensions exceed `max_pixels`.
pub fn decode_png(bytes: &[u8], max_pixels: u64) -> Result<Bitmap, DecodeError> {
    check_chunks(bytes)?;
    let img = read_image(bytes, ImageFormat::Png, max_pixels)?;
    Ok(Bitmap::from_dynamic(img))
}

/// Walk `length | type | data | crc` chunks until `IEND`.
fn check_chunks(bytes: &[u8]) -> Result<(), DecodeError> {
    let mut pos = SIGNATURE_LEN;

    while pos < bytes.len() {
        let Some(header) = bytes.get(pos..pos + 8) else {
            return Err(DecodeError::Truncated(
                "PNG ends inside a chunk header".to_string(),
            ));
        };
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let chunk_type = &header[4..8];

        let end = chunk_end(pos, length)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| {
                DecodeError::Truncated(format!(
                    "PNG chunk {} runs past the end of the file",
                    String::from_utf8_lossy(chunk_type)
                ))
            })?;

        if chunk_type == IEND {
            return Ok(());
        }
        pos = end;
    }

    Err(DecodeError::Truncated(
        "PNG is missing its IEND chunk".to_string(),
    ))
}

/// End offset of the chunk starting at `pos`: header, data and 4-byte CRC.
///
/// `length` is untrusted and `usize` is 32 bits on wasm, so the sum is checked.
fn chunk_end(pos: usize, length: usize) -> Option<usize> {
    pos.checked_add(8)
        .and_then(|p| p.checked_add(length))
        .and_then(|p| p.checked_add(4))
        .filter(|&end| end > pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PixelFormat;
    use crate::test_support::{gradient_bitmap, png_fixture, rgba_bitmap};

    const NO_LIMIT: u64 = u64::MAX;

    #[test]
    fn test_decode_rgb_png() {
        let source = gradient_bitmap(20, 10);
        let bitmap = decode_png(&png_fixture(&source), NO_LIMIT).unwrap();

        assert_eq!(bitmap.format, PixelFormat::Rgb8);
        // PNG is lossless
        assert_eq!(bitmap, source);
    }

    #[test]
    fn test_decode_rgba_png_keeps_alpha() {
        let source = rgba_bitmap(12, 12);
        let bitmap = decode_png(&png_fixture(&source), NO_LIMIT).unwrap();

        assert_eq!(bitmap.format, PixelFormat::Rgba8);
        assert_eq!(bitmap.pixels, source.pixels);
    }

    #[test]
    fn test_truncated_png_rejected() {
        let bytes = png_fixture(&gradient_bitmap(64, 64));
        let half = &bytes[..bytes.len() / 2];

        assert!(matches!(
            decode_png(half, NO_LIMIT),
            Err(DecodeError::Truncated(_))
        ));
    }

    #[test]
    fn test_missing_iend_rejected() {
        let bytes = png_fixture(&gradient_bitmap(8, 8));
        // IEND is the final 12 bytes
        let without_iend = &bytes[..bytes.len() - 12];

        assert!(matches!(
            check_chunks(without_iend),
            Err(DecodeError::Truncated(msg)) if msg.contains("IEND")
        ));
    }

    fn with_ihdr_length(length: u32) -> Vec<u8> {
        let mut bytes = png_fixture(&gradient_bitmap(8, 8));
        bytes[SIGNATURE_LEN..SIGNATURE_LEN + 4].copy_from_slice(&length.to_be_bytes());
        bytes
    }

    #[test]
    fn test_oversized_chunk_length_rejected() {
        for length in [0xFFFF_FFF4, 0xFFFF_FFFF, 0x7FFF_FFFF] {
            assert!(
                matches!(
                    check_chunks(&with_ihdr_length(length)),
                    Err(DecodeError::Truncated(_))
                ),
                "length {length:#X} must be rejected"
            );
        }
    }

    #[test]
    fn test_chunk_end_overflow() {
        assert_eq!(chunk_end(8, 13), Some(33));
        assert_eq!(chunk_end(8, usize::MAX - 11), None);
        assert_eq!(chunk_end(usize::MAX - 4, 0), None);
    }

    #[test]
    fn test_signature_only_rejected() {
        let bytes = png_fixture(&gradient_bitmap(8, 8));
        assert!(check_chunks(&bytes[..SIGNATURE_LEN]).is_err());
    }

    #[test]
    fn test_pixel_limit_enforced() {
        let bytes = png_fixture(&gradient_bitmap(20, 10));
        assert!(matches!(
            decode_png(&bytes, 100),
            Err(DecodeError::TooLarge { .. })
        ));
    }
}
