//! WASM-compatible wrapper types for rasters and artifacts.

use showcrop_core::{OutputArtifact, Raster};
use wasm_bindgen::prelude::*;

use crate::error::type_error;

/// A decoded RGBA image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. Keep the image in WASM memory and only
/// extract pixels when they are needed (e.g. to paint a preview canvas).
#[wasm_bindgen]
pub struct JsRaster {
    inner: Raster,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from RGBA pixel data (4 bytes per pixel, row-major order).
    ///
    /// Straight (non-premultiplied) alpha, as returned by `getImageData`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        Raster::from_rgba(width, height, pixels)
            .map(JsRaster::from_raster)
            .ok_or_else(|| type_error("pixel data does not match width * height * 4"))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter, js_name = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGBA pixel data as a Uint8Array, ready for `new ImageData(...)`.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Move the pixel data out to JavaScript, consuming the raster.
    ///
    /// Avoids holding a second copy in WASM memory when the raster is not
    /// needed afterwards.
    #[wasm_bindgen(js_name = intoPixels)]
    pub fn into_pixels(self) -> Vec<u8> {
        self.inner.into_pixels()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsRaster {
    pub(crate) fn from_raster(inner: Raster) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &Raster {
        &self.inner
    }
}

/// An encoded crop, ready to append to a `FormData` upload.
///
/// ```typescript
/// const artifact = editor.apply();
/// const blob = new Blob([artifact.bytes()], { type: artifact.mimeType });
/// form.append('avatar', blob, artifact.suggestedFilename);
/// ```
#[wasm_bindgen]
pub struct JsArtifact {
    inner: OutputArtifact,
}

#[wasm_bindgen]
impl JsArtifact {
    /// Encoded file bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter, js_name = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    #[wasm_bindgen(getter, js_name = suggestedFilename)]
    pub fn suggested_filename(&self) -> String {
        self.inner.suggested_filename.clone()
    }

    #[wasm_bindgen(getter, js_name = qualityUsed)]
    pub fn quality_used(&self) -> f64 {
        self.inner.quality_used
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Everything except the bytes, as a plain object.
    pub fn metadata(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsArtifact {
    pub(crate) fn from_artifact(inner: OutputArtifact) -> Self {
        Self { inner }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_mismatched_pixels_throw() {
        assert!(JsRaster::new(2, 2, vec![0u8; 15]).is_err());
    }
}
