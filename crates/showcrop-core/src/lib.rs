//! Showcrop Core - rotation-aware image crop pipeline
//!
//! This crate turns a user-supplied image plus an interactive crop session
//! (zoom, rotation, pan, aspect ratio) into an encoded file ready for upload.
//! The same engine serves square avatars and wide showcase covers; the two
//! flows differ only in their [`PipelineConfig`].
//!
//! # Stages
//!
//! 1. [`decode`] - bytes, `data:` URI or fetched URL into a [`Raster`]
//! 2. [`transform::rotated_bounds`] - bounding box of the rotated source
//! 3. [`transform::composite`] - source drawn rotated into that box
//! 4. [`transform::extract`] - crop rectangle copied out of the composite
//! 5. [`encode`] - JPEG (default) or PNG [`OutputArtifact`]
//!
//! [`CropPipeline`] runs stages 2-5 for one session and [`CropEditor`] wraps
//! the whole flow in the edit-session state machine.
//!
//! No logging subscriber is installed here; events go through `tracing`.

pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod session;
pub mod transform;

pub use config::{ConfigError, PipelineConfig};
pub use decode::{decode, DecodeError, ImageSource, OfflineFetcher, SourceFetcher};
pub use editor::{CancelHandle, CropEditor, EditState};
pub use encode::{encode, EncodeError, OutputArtifact, OutputFormat, DEFAULT_QUALITY};
pub use error::{CropError, CropResult};
pub use pipeline::CropPipeline;
pub use raster::Raster;
pub use session::{AspectPolicy, CropSession, CropShape, Pan, SessionError};
pub use transform::{
    composite, extract, normalize_rotation, rotated_bounds, Background, CompositeError,
    CompositeLimits, CropOutOfBoundsError, CropRect,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Logs from a full run are visible with `cargo test -- --nocapture`.
    #[test]
    fn test_end_to_end_with_subscriber() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish(),
        );

        let source = Raster::filled(120, 80, [40, 120, 200, 255]).unwrap();
        let pipeline = CropPipeline::new(PipelineConfig::showcase()).unwrap();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_rotation(-15.0).unwrap();
        session.set_zoom(1.5).unwrap();
        let rect = session.fit_crop_rect(120, 80);

        let artifact = pipeline.run(&source, &session).unwrap();
        assert_eq!((artifact.width, artifact.height), rect.output_size());
        assert_eq!(artifact.suggested_filename, "showcase.jpg");
        assert!(OutputFormat::Jpeg.has_signature(&artifact.bytes));
    }
}
