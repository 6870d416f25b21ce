//! WASM-compatible wrapper for compression outcomes.
//!
//! The core [`CompressionOutcome`] is a Rust enum carrying error values, which
//! JavaScript cannot consume directly. [`JsCompressionOutcome`] flattens it
//! into a tagged object with a `kind` string and optional payload fields.

use pixbudget_core::{CompressionOutcome, ImageFormat};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutcomeKind {
    Success,
    Warning,
    Error,
}

impl OutcomeKind {
    fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Warning => "warning",
            OutcomeKind::Error => "error",
        }
    }
}

/// Result of one `compress_image` call.
///
/// `kind` is `"success"`, `"warning"` or `"error"`. On success the encoded
/// bytes, data URL and final dimensions are set; otherwise `message` holds a
/// human-readable reason and the payload fields are empty.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// `Uint8Array`; `dataUrl` builds a new string on each access.
#[wasm_bindgen]
pub struct JsCompressionOutcome {
    kind: OutcomeKind,
    message: Option<String>,
    bytes: Vec<u8>,
    format: Option<ImageFormat>,
    width: u32,
    height: u32,
    quality: f32,
    attempts: u32,
}

#[wasm_bindgen]
impl JsCompressionOutcome {
    /// `"success"`, `"warning"` or `"error"`
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.kind.as_str().to_string()
    }

    /// Reason for a warning or error; `undefined` on success
    #[wasm_bindgen(getter)]
    pub fn message(&self) -> Option<String> {
        self.message.clone()
    }

    #[wasm_bindgen(getter, js_name = isSuccess)]
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    /// MIME type of the encoded image; `undefined` unless successful
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> Option<String> {
        self.format.map(|format| format.mime().to_string())
    }

    /// Final width in pixels (0 unless successful)
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Final height in pixels (0 unless successful)
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Quality lever of the accepted attempt, in `[0, 1]`
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Number of encoder invocations spent
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Encoded size in bytes
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the encoded image as a Uint8Array (a copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// `data:<mime>;base64,...` string, ready to persist or assign to
    /// `img.src`; `undefined` unless successful.
    #[wasm_bindgen(getter, js_name = dataUrl)]
    pub fn data_url(&self) -> Option<String> {
        self.format.map(|format| {
            pixbudget_core::CompressedImage {
                bytes: self.bytes.clone(),
                format,
                width: self.width,
                height: self.height,
                quality: self.quality,
                attempts: self.attempts,
            }
            .data_url()
        })
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsCompressionOutcome {
    pub(crate) fn from_outcome(outcome: CompressionOutcome) -> Self {
        let failed = |kind, message: String| Self {
            kind,
            message: Some(message),
            bytes: Vec::new(),
            format: None,
            width: 0,
            height: 0,
            quality: 0.0,
            attempts: 0,
        };

        match outcome {
            CompressionOutcome::Success(image) => Self {
                kind: OutcomeKind::Success,
                message: None,
                format: Some(image.format),
                width: image.width,
                height: image.height,
                quality: image.quality,
                attempts: image.attempts,
                bytes: image.bytes,
            },
            CompressionOutcome::Warning(err) => failed(OutcomeKind::Warning, err.to_string()),
            CompressionOutcome::Error(err) => failed(OutcomeKind::Error, err.to_string()),
        }
    }
}
