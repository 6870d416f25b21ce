//! Compression WASM bindings.
//!
//! This module exposes the pixbudget-core pipeline to JavaScript. The call is
//! CPU-bound and synchronous; load the module in a Web Worker so the page
//! stays responsive while the budget search runs.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress an image so it fits a byte budget
//! - [`is_supported_type`] - Check a MIME type before reading the file
//! - [`default_budget`] - The default byte budget (8 KiB)
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, default_budget } from '@pixbudget/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const outcome = compress_image(bytes, file.type, default_budget());
//!
//! if (outcome.isSuccess) {
//!   await chrome.storage.sync.set({ avatar: outcome.dataUrl });
//! } else {
//!   console.warn(outcome.kind, outcome.message);
//! }
//! ```

use crate::types::JsCompressionOutcome;
use pixbudget_core::{compress_bytes, is_supported_mime, CompressOptions, DEFAULT_BUDGET};
use wasm_bindgen::prelude::*;

/// Compress an image so the encoded result fits within `budget` bytes.
///
/// # Arguments
///
/// * `bytes` - The raw file bytes as a `Uint8Array`
/// * `mime` - The file's declared MIME type (`File.type`)
/// * `budget` - Maximum output size in bytes; must be positive
/// * `options` - Optional plain object overriding `CompressOptions` fields
///   (`maxAttempts`, `minDimension`, `outputFormat`, ...)
///
/// # Returns
///
/// A `JsCompressionOutcome` whose `kind` is `"success"`, `"warning"` (the file
/// type is not PNG or JPEG) or `"error"` (decode failure, invalid budget or
/// options, or the budget cannot be met).
///
/// # Errors
///
/// Returns an error only if `options` is not a valid options object.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    mime: &str,
    budget: f64,
    options: JsValue,
) -> Result<JsCompressionOutcome, JsValue> {
    let options = parse_options(options)?;
    Ok(compress_with(bytes, mime, budget, &options))
}

/// Check whether a MIME type is accepted by [`compress_image`].
#[wasm_bindgen]
pub fn is_supported_type(mime: &str) -> bool {
    is_supported_mime(mime)
}

/// The default byte budget, sized for one `storage.sync` item.
#[wasm_bindgen]
pub fn default_budget() -> u32 {
    DEFAULT_BUDGET as u32
}

fn parse_options(value: JsValue) -> Result<CompressOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CompressOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn compress_with(
    bytes: &[u8],
    mime: &str,
    budget: f64,
    options: &CompressOptions,
) -> JsCompressionOutcome {
    let outcome = compress_bytes(bytes, mime, budget_from_js(budget), options);
    JsCompressionOutcome::from_outcome(outcome)
}

/// JS numbers are doubles. Fractions truncate; NaN maps to 0 and is rejected
/// downstream as an invalid budget.
fn budget_from_js(budget: f64) -> i64 {
    budget.trunc() as i64
}
