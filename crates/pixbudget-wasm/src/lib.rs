//! Pixbudget WASM - WebAssembly bindings for Pixbudget
//!
//! This crate exposes the pixbudget-core compression pipeline to the avatar
//! picker front-end.
//!
//! # Module Structure
//!
//! - `compress` - The `compress_image` entry point and MIME helpers
//! - `types` - WASM-compatible wrapper for compression outcomes
//! - `logging` - Forwards `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@pixbudget/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const outcome = compress_image(bytes, file.type, 8192);
//! console.log(`${outcome.kind}: ${outcome.size} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logging;
mod types;

// Re-export public types
pub use compress::{compress_image, default_budget, is_supported_type};
pub use types::JsCompressionOutcome;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
