//! Core types for source decoding.

use thiserror::Error;

/// Error types for source decoding.
///
/// Every variant is user-retryable: the host surfaces it and lets the user
/// pick another source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The source contained no bytes.
    #[error("Image source is empty")]
    EmptySource,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    Corrupted(String),

    /// The data URI could not be parsed.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The remote source could not be fetched.
    #[error("Image source is unreachable: {0}")]
    Unreachable(String),

    /// The remote source was fetched but may not be read back.
    #[error("Cross-origin image cannot be read: {0}")]
    CrossOrigin(String),
}

/// Where a raster comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded file bytes, e.g. from a file picker or drop zone.
    Bytes(Vec<u8>),
    /// A `data:` URI, e.g. a previously previewed image.
    DataUri(String),
    /// A remote image loaded for re-edit.
    Url(String),
}

impl ImageSource {
    /// Short label for logging (never includes payload bytes).
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Bytes(_) => "bytes",
            ImageSource::DataUri(_) => "data-uri",
            ImageSource::Url(_) => "url",
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Dereferences remote image URLs.
///
/// The core has no network stack; the host supplies one. Implementations
/// report unreachable hosts with [`DecodeError::Unreachable`] and opaque
/// cross-origin responses with [`DecodeError::CrossOrigin`].
pub trait SourceFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError>;
}

/// A fetcher for hosts without network access. Refuses every URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl SourceFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::Unreachable(format!("no fetcher available for {url}")))
    }
}
