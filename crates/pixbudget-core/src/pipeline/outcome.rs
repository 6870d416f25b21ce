//! Tagged result of one compression invocation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CompressError;
use crate::format::ImageFormat;

/// An encoded image that fits its budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Quality lever of the accepted attempt, in `[0, 1]`.
    pub quality: f32,
    /// Encoder invocations spent.
    pub attempts: u32,
}

impl CompressedImage {
    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `data:<mime>;base64,<payload>`, ready for an `<img src>` or storage.
    pub fn data_url(&self) -> String {
        let mut url = self.format.data_url_prefix();
        STANDARD.encode_string(&self.bytes, &mut url);
        url
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Exactly one of these is produced per invocation.
#[derive(Debug)]
pub enum CompressionOutcome {
    /// The image was compressed within budget.
    Success(CompressedImage),
    /// The input was rejected in a way the user can fix (wrong file type).
    Warning(CompressError),
    /// Processing failed.
    Error(CompressError),
}

impl CompressionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompressionOutcome::Success(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, CompressionOutcome::Warning(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CompressionOutcome::Error(_))
    }

    /// The compressed image, if any.
    pub fn image(&self) -> Option<&CompressedImage> {
        match self {
            CompressionOutcome::Success(image) => Some(image),
            _ => None,
        }
    }

    /// The failure, for warnings and errors.
    pub fn error(&self) -> Option<&CompressError> {
        match self {
            CompressionOutcome::Warning(err) | CompressionOutcome::Error(err) => Some(err),
            CompressionOutcome::Success(_) => None,
        }
    }

    /// Convert into a plain `Result`, merging the warning and error channels.
    pub fn into_result(self) -> Result<CompressedImage, CompressError> {
        match self {
            CompressionOutcome::Success(image) => Ok(image),
            CompressionOutcome::Warning(err) | CompressionOutcome::Error(err) => Err(err),
        }
    }
}

impl From<Result<CompressedImage, CompressError>> for CompressionOutcome {
    fn from(result: Result<CompressedImage, CompressError>) -> Self {
        match result {
            Ok(image) => CompressionOutcome::Success(image),
            Err(err) if err.is_recoverable() => CompressionOutcome::Warning(err),
            Err(err) => CompressionOutcome::Error(err),
        }
    }
}
