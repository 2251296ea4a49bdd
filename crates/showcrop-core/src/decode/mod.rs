//! Source decoding for the crop pipeline.
//!
//! This module turns an [`ImageSource`] into a [`Raster`]:
//! - Encoded bytes from a file picker (JPEG, PNG, WebP)
//! - `data:` URIs
//! - Remote URLs, dereferenced by a host-supplied [`SourceFetcher`]
//!
//! Size and MIME limits are enforced by the upload form before this stage
//! runs; the decoder accepts whatever the picker let through.
//!
//! # Examples
//!
//! ```ignore
//! use showcrop_core::decode::{decode, ImageSource, OfflineFetcher};
//!
//! let bytes = std::fs::read("avatar.png").unwrap();
//! let raster = decode(&ImageSource::Bytes(bytes), &OfflineFetcher).unwrap();
//! println!("Decoded {}x{} image", raster.width(), raster.height());
//! ```

mod codec;
mod data_uri;
mod types;

pub use codec::{decode_bytes, read_orientation, Orientation};
pub use data_uri::{parse_data_uri, DataUri};
pub use types::{DecodeError, ImageSource, OfflineFetcher, SourceFetcher};

use crate::raster::Raster;

/// Decode any supported source into a raster.
#[tracing::instrument(level = "debug", skip_all, fields(source = source.kind()))]
pub fn decode(source: &ImageSource, fetcher: &dyn SourceFetcher) -> Result<Raster, DecodeError> {
    let result = match source {
        ImageSource::Bytes(bytes) => decode_bytes(bytes),
        ImageSource::DataUri(uri) => parse_data_uri(uri).and_then(|d| decode_bytes(&d.bytes)),
        ImageSource::Url(url) => fetcher.fetch(url).and_then(|bytes| decode_bytes(&bytes)),
    };

    match &result {
        Ok(raster) => tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            "decoded source"
        ),
        Err(e) => tracing::warn!(error = %e, "failed to decode source"),
    }
    result
}
