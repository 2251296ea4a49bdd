//! Conversion of core errors into JavaScript `Error` objects.
//!
//! The thrown error's `name` is the error kind (`"DecodeError"`,
//! `"CropOutOfBoundsError"`, ...) and its `message` is the user-facing text.
//! Technical detail goes to the browser console.

use showcrop_core::CropError;
use wasm_bindgen::prelude::*;

pub(crate) fn to_js_error(err: impl Into<CropError>) -> JsValue {
    let err = err.into();
    web_sys::console::warn_1(&JsValue::from_str(&format!("showcrop: {}", err)));

    let js = js_sys::Error::new(err.user_message());
    js.set_name(err.kind());
    js.into()
}

/// Error for malformed arguments coming from JavaScript.
pub(crate) fn type_error(message: &str) -> JsValue {
    js_sys::TypeError::new(message).into()
}
