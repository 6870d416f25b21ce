//! Pipeline orchestration: validate, decode, search, report.
//!
//! Every entry point yields exactly one [`CompressionOutcome`]. The declared
//! MIME type is checked before anything else, so a rejected file never
//! reaches the decoder or encoder.

mod outcome;
mod source;
#[cfg(not(target_arch = "wasm32"))]
mod task;

use std::io::Read;

use crate::budget::Budget;
use crate::config::CompressOptions;
use crate::decode::{self, Bitmap};
use crate::encode::{self, EncodeError, EncodeParams};
use crate::error::CompressError;
use crate::format::ImageFormat;
use crate::search;

pub use outcome::{CompressedImage, CompressionOutcome};
pub use source::SourceImage;
#[cfg(not(target_arch = "wasm32"))]
pub use task::{compress_in_background, CompressionTask, Compressor};

/// Compress `source` so that the result fits `budget`.
pub fn compress(
    source: &SourceImage,
    budget: Budget,
    options: &CompressOptions,
) -> CompressionOutcome {
    let filter = options.resize_filter;
    run_with(source, budget, options, |bitmap, params| {
        encode::encode(bitmap, params, filter)
    })
    .into()
}

/// Compress an image read from `reader`.
///
/// The MIME type is checked first; an unsupported type is reported without
/// reading from `reader` at all.
pub fn compress_reader<R: Read>(
    reader: R,
    mime: &str,
    budget: Budget,
    options: &CompressOptions,
) -> CompressionOutcome {
    if let Err(err) = accepted_format(mime) {
        return CompressionOutcome::Warning(err);
    }
    match SourceImage::from_reader(reader, mime) {
        Ok(source) => compress(&source, budget, options),
        Err(err) => CompressionOutcome::Error(err),
    }
}

/// Compress raw bytes with an unchecked budget, as handed over by a host
/// environment.
///
/// A budget of zero or below yields `Error(InvalidBudget)`.
pub fn compress_bytes(
    bytes: &[u8],
    mime: &str,
    budget: i64,
    options: &CompressOptions,
) -> CompressionOutcome {
    if let Err(err) = accepted_format(mime) {
        return CompressionOutcome::Warning(err);
    }
    match Budget::from_signed(budget) {
        Ok(budget) => compress(&SourceImage::new(bytes, mime), budget, options),
        Err(err) => CompressionOutcome::Error(err),
    }
}

fn accepted_format(mime: &str) -> Result<ImageFormat, CompressError> {
    ImageFormat::from_mime(mime).ok_or_else(|| {
        log::warn!("Rejected unsupported file type {:?}", mime);
        CompressError::FormatRejected(mime.to_owned())
    })
}

fn run_with<F>(
    source: &SourceImage,
    budget: Budget,
    options: &CompressOptions,
    encode: F,
) -> Result<CompressedImage, CompressError>
where
    F: FnMut(&Bitmap, &EncodeParams) -> Result<Vec<u8>, EncodeError>,
{
    let source_format = accepted_format(source.mime())?;
    options.validate()?;

    let bitmap = decode::decode(source.bytes(), source_format, options.max_source_pixels)?;
    let output_format = options.output_format_for(source_format);
    let encoded = search::search_with(&bitmap, output_format, budget, options, encode)?;

    log::info!(
        "Compressed {}x{} {} ({} bytes) to {}x{} {} ({} bytes) in {} attempt(s)",
        bitmap.width,
        bitmap.height,
        source_format,
        source.len(),
        encoded.params.width,
        encoded.params.height,
        output_format,
        encoded.bytes.len(),
        encoded.attempts
    );

    Ok(CompressedImage {
        bytes: encoded.bytes,
        format: output_format,
        width: encoded.params.width,
        height: encoded.params.height,
        quality: encoded.params.quality,
        attempts: encoded.attempts,
    })
}
