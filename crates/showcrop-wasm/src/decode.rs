//! Image decoding WASM bindings.
//!
//! - [`decode_image`] - Decode JPEG, PNG or WebP bytes from a file picker
//! - [`decode_data_uri`] - Decode a `data:` URI, e.g. from `FileReader.readAsDataURL`
//!
//! Remote URLs are fetched by the JavaScript host, which passes the bytes
//! in; a cross-origin response it cannot read should never reach here.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@showcrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use showcrop_core::decode::{self, ImageSource, OfflineFetcher};
use wasm_bindgen::prelude::*;

use crate::error::to_js_error;
use crate::types::JsRaster;

/// Decode an image from bytes, applying EXIF orientation.
///
/// Throws a `DecodeError` for empty, unsupported or corrupted data.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    decode::decode_bytes(bytes)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}

/// Decode a base64 `data:` URI.
#[wasm_bindgen]
pub fn decode_data_uri(uri: &str) -> Result<JsRaster, JsValue> {
    decode::decode(&ImageSource::DataUri(uri.to_string()), &OfflineFetcher)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}
