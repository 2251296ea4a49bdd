//! Showcrop WASM - WebAssembly bindings for the showcrop crop pipeline
//!
//! This crate exposes showcrop-core to the avatar and showcase upload forms.
//!
//! # Module Structure
//!
//! - `editor` - `JsCropEditor`, the edit-session state machine
//! - `types` - WASM-compatible wrappers for rasters and artifacts
//! - `decode` - Image decoding bindings (bytes and `data:` URIs)
//! - `transform` - Rotated bounds, compositing and extraction
//! - `encode` - JPEG/PNG encoding bindings
//!
//! Errors are thrown as JavaScript `Error`s whose `name` is the error kind
//! and whose `message` can be shown to the user.
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@showcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = JsCropEditor.avatar();
//! editor.loadBytes(new Uint8Array(await file.arrayBuffer()));
//! editor.fitCropRect();
//! const artifact = editor.apply();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod error;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_data_uri, decode_image};
pub use editor::JsCropEditor;
pub use encode::encode;
pub use transform::{composite, extract, normalize_rotation, rotated_bounds};
pub use types::{JsArtifact, JsRaster};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // TODO: install console_error_panic_hook once it is added as a dependency
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
