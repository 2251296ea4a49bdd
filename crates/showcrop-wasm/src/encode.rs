//! WASM bindings for encoding.
//!
//! ```typescript
//! const artifact = encode(cropped, 'jpeg', 0.95, 'avatar');
//! console.log(artifact.suggestedFilename); // "avatar.jpg"
//! ```

use showcrop_core::encode::{encode as core_encode, OutputFormat, DEFAULT_QUALITY};
use wasm_bindgen::prelude::*;

use crate::error::{to_js_error, type_error};
use crate::types::{JsArtifact, JsRaster};

fn parse_format(format: &str) -> Option<OutputFormat> {
    match format.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" | "image/jpeg" => Some(OutputFormat::Jpeg),
        "png" | "image/png" => Some(OutputFormat::Png),
        _ => None,
    }
}

/// Encode a raster for upload.
///
/// # Arguments
///
/// * `image` - Raster to encode
/// * `format` - `"jpeg"` or `"png"`
/// * `quality` - Lossy quality in (0, 1]; defaults to 0.95
/// * `filename_stem` - Artifact name without extension
///
/// JPEG output flattens transparent pixels onto white.
#[wasm_bindgen]
pub fn encode(
    image: &JsRaster,
    format: &str,
    quality: Option<f64>,
    filename_stem: &str,
) -> Result<JsArtifact, JsValue> {
    let format =
        parse_format(format).ok_or_else(|| type_error("format must be \"jpeg\" or \"png\""))?;
    core_encode(
        image.raster(),
        format,
        quality.unwrap_or(DEFAULT_QUALITY),
        [255, 255, 255],
        filename_stem,
    )
    .map(JsArtifact::from_artifact)
    .map_err(to_js_error)
}
