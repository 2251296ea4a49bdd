//! Encoding of extracted crops into upload artifacts.
//!
//! This module provides:
//! - Lossy JPEG encoding with a (0, 1] quality (default 0.95)
//! - Lossless PNG encoding for alpha-capable output
//!
//! Encoding is all-or-nothing: an [`OutputArtifact`] is only returned once
//! the codec has finished and its bytes carry the format's file signature.
//!
//! No shape mask is applied here. A round crop guide in the UI still yields
//! the full rectangular crop.
//!
//! # Examples
//!
//! ```ignore
//! use showcrop_core::encode::{encode, OutputFormat, DEFAULT_QUALITY};
//!
//! let artifact = encode(&raster, OutputFormat::Jpeg, DEFAULT_QUALITY, [255; 3], "avatar")?;
//! assert_eq!(artifact.suggested_filename, "avatar.jpg");
//! ```

mod jpeg;
mod png;
mod types;

pub use jpeg::{encode_jpeg, flatten_rgba, jpeg_quality};
pub use png::encode_png;
pub use types::{EncodeError, OutputArtifact, OutputFormat, DEFAULT_QUALITY};

use crate::raster::Raster;

/// Encode a raster into an upload artifact.
///
/// `fill` is the opaque colour that transparent pixels are flattened onto
/// for formats without alpha. `filename_stem` names the artifact, e.g.
/// `"avatar"` becomes `"avatar.jpg"`.
pub fn encode(
    image: &Raster,
    format: OutputFormat,
    quality: f64,
    fill: [u8; 3],
    filename_stem: &str,
) -> Result<OutputArtifact, EncodeError> {
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let (bytes, quality_used) = match format {
        OutputFormat::Jpeg => {
            let q = jpeg_quality(quality);
            let rgb = flatten_rgba(image, fill);
            let bytes = encode_jpeg(&rgb, image.width(), image.height(), q)?;
            (bytes, f64::from(q) / 100.0)
        }
        OutputFormat::Png => (encode_png(image)?, 1.0),
    };

    if !format.has_signature(&bytes) {
        return Err(EncodeError::InvalidOutput(format));
    }

    tracing::debug!(
        %format,
        bytes = bytes.len(),
        quality = quality_used,
        "encoded artifact"
    );

    Ok(OutputArtifact {
        bytes,
        mime_type: format.mime_type(),
        suggested_filename: format!("{}.{}", filename_stem, format.extension()),
        quality_used,
        width: image.width(),
        height: image.height(),
    })
}
