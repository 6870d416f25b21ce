//! JPEG decoding with structural validation and EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

use super::{read_image, Bitmap, DecodeError, Orientation};
use crate::format::ImageFormat;

const MARKER_PREFIX: u8 = 0xFF;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;

/// Decode a JPEG image from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::Truncated` if the marker stream ends early or the
/// end-of-image marker is missing, `DecodeError::CorruptedFile` if the
/// entropy-coded data is invalid, and `DecodeError::TooLarge` if the
/// header dimensions exceed `max_pixels`.
pub fn decode_jpeg(bytes: &[u8], max_pixels: u64) -> Result<Bitmap, DecodeError> {
    check_structure(bytes)?;

    let orientation = extract_orientation(bytes);
    let img = read_image(bytes, ImageFormat::Jpeg, max_pixels)?;

    Ok(Bitmap::from_dynamic(apply_orientation(img, orientation)))
}

/// Walk the marker segments up to the first scan and require an EOI after it.
///
/// Entropy-coded data byte-stuffs every `0xFF`, so `FF D9` after the scan
/// header can only be the real end-of-image marker.
fn check_structure(bytes: &[u8]) -> Result<(), DecodeError> {
    // Skip SOI
    let mut pos = 2;

    loop {
        if pos >= bytes.len() {
            return Err(DecodeError::Truncated(
                "JPEG ends before start of scan".to_string(),
            ));
        }
        if bytes[pos] != MARKER_PREFIX {
            return Err(DecodeError::CorruptedFile(format!(
                "expected JPEG marker at offset {pos}"
            )));
        }

        // Any number of 0xFF fill bytes may precede a marker code
        while pos < bytes.len() && bytes[pos] == MARKER_PREFIX {
            pos += 1;
        }
        let Some(&marker) = bytes.get(pos) else {
            return Err(DecodeError::Truncated(
                "JPEG ends inside a marker".to_string(),
            ));
        };
        pos += 1;

        match marker {
            // Standalone markers carry no length field
            0x01 | 0xD0..=0xD8 => continue,
            EOI => {
                return Err(DecodeError::Truncated(
                    "JPEG ends before any scan data".to_string(),
                ))
            }
            _ => {}
        }

        let Some(len_bytes) = bytes.get(pos..pos + 2) else {
            return Err(DecodeError::Truncated(
                "JPEG ends inside a segment header".to_string(),
            ));
        };
        let segment_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        if segment_len < 2 {
            return Err(DecodeError::CorruptedFile(format!(
                "invalid segment length {segment_len} for marker 0x{marker:02X}"
            )));
        }
        if pos + segment_len > bytes.len() {
            return Err(DecodeError::Truncated(format!(
                "segment 0x{marker:02X} runs past the end of the file"
            )));
        }
        pos += segment_len;

        if marker == SOS {
            break;
        }
    }

    let has_eoi = bytes[pos..]
        .windows(2)
        .any(|pair| pair == [MARKER_PREFIX, EOI]);
    if has_eoi {
        Ok(())
    } else {
        Err(DecodeError::Truncated(
            "JPEG is missing its end-of-image marker".to_string(),
        ))
    }
}

/// Returns `Orientation::Normal` when no EXIF orientation can be read.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
