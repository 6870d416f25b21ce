//! Pixbudget Core - Budget-bounded image compression
//!
//! This crate re-encodes user-selected PNG and JPEG images so the result fits
//! a byte budget (8 KiB by default, the per-key limit of browser sync
//! storage), trading quality before resolution for JPEG and resolution
//! before quality for PNG.

pub mod budget;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod search;

#[cfg(test)]
mod test_support;

pub use budget::{Budget, DEFAULT_BUDGET};
pub use config::{CompressOptions, ConfigError};
pub use decode::{Bitmap, DecodeError, FilterType, PixelFormat};
pub use encode::{EncodeError, EncodeParams};
pub use error::CompressError;
pub use format::ImageFormat;
pub use pipeline::{
    compress, compress_bytes, compress_reader, CompressedImage, CompressionOutcome, SourceImage,
};
#[cfg(not(target_arch = "wasm32"))]
pub use pipeline::{compress_in_background, CompressionTask, Compressor};

/// Whether `mime` names a type the pipeline accepts.
pub fn is_supported_mime(mime: &str) -> bool {
    ImageFormat::from_mime(mime).is_some()
}
