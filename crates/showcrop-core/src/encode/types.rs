//! Artifact and format types for encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lossy quality: high fidelity without maximizing artifact size.
pub const DEFAULT_QUALITY: f64 = 0.95;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Quality must lie in (0, 1]
    #[error("Invalid quality {0}: must be greater than 0 and at most 1")]
    InvalidQuality(f64),

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec failed
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed {
        format: OutputFormat,
        reason: String,
    },

    /// The codec returned bytes without a valid file signature
    #[error("{0} encoder produced an invalid file")]
    InvalidOutput(OutputFormat),
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Lossy JPEG, the upload default.
    #[default]
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the format stores an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }

    /// Check the standard file signature of this format.
    pub fn has_signature(self, bytes: &[u8]) -> bool {
        match self {
            // SOI ... EOI
            OutputFormat::Jpeg => {
                bytes.len() >= 4 && bytes.starts_with(&[0xFF, 0xD8]) && bytes.ends_with(&[0xFF, 0xD9])
            }
            OutputFormat::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
        })
    }
}

/// An encoded crop, ready to hand to the upload transport.
///
/// Created once per apply and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputArtifact {
    /// Encoded file bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub suggested_filename: String,
    /// Quality actually passed to the codec, on the (0, 1] scale.
    pub quality_used: f64,
    pub width: u32,
    pub height: u32,
}

impl OutputArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
