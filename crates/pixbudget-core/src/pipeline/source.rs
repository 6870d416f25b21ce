//! User-supplied source file.

use std::io::Read;

use crate::error::CompressError;
use crate::format::ImageFormat;

/// Raw file bytes plus the MIME type the picker declared for them.
///
/// Immutable once built; the pipeline only ever borrows the bytes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime: String,
}

impl SourceImage {
    pub fn new(bytes: impl Into<Vec<u8>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// Read the whole stream into memory.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::ReadFailed` if the reader fails.
    pub fn from_reader<R: Read>(
        mut reader: R,
        mime: impl Into<String>,
    ) -> Result<Self, CompressError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(bytes, mime))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared MIME type, as given.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The declared format, if it is one the pipeline supports.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime(&self.mime)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
