//! The crop pipeline: rotated bounds, composite, extract, encode.

use crate::config::{ConfigError, PipelineConfig};
use crate::encode::{encode, OutputArtifact};
use crate::error::CropResult;
use crate::raster::Raster;
use crate::session::{CropSession, SessionError};
use crate::transform::{composite, extract};

/// Runs a crop session against a decoded raster with one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CropPipeline {
    pub(crate) config: PipelineConfig,
}

impl CropPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Produce the cropped raster without encoding it.
    ///
    /// Fails with [`SessionError::MissingCropRect`] if the session has no
    /// rectangle for its current rotation and aspect ratio.
    pub fn render(&self, raster: &Raster, session: &CropSession) -> CropResult<Raster> {
        let rect = session.crop_rect().ok_or(SessionError::MissingCropRect)?;
        let composed = composite(
            raster,
            session.rotation_deg(),
            self.config.background(),
            &self.config.limits,
        )?;
        Ok(extract(&composed, &rect)?)
    }

    /// Run every stage and return the encoded artifact.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            source_width = raster.width(),
            source_height = raster.height(),
            rotation = session.rotation_deg()
        )
    )]
    pub fn run(&self, raster: &Raster, session: &CropSession) -> CropResult<OutputArtifact> {
        let result = self.render(raster, session).and_then(|cropped| {
            let config = &self.config;
            Ok(encode(
                &cropped,
                config.format,
                config.quality,
                config.fill,
                &config.filename_stem,
            )?)
        });

        if let Err(e) = &result {
            tracing::warn!(error = %e, kind = e.kind(), "crop pipeline failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::OutputFormat;
    use crate::error::CropError;
    use crate::transform::CropRect;
    use std::sync::{Arc, Mutex};

    /// Every pixel is distinct so permutations are detectable.
    fn numbered(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x % 256) as u8,
                    (y % 256) as u8,
                    ((x + y) % 251) as u8,
                    255,
                ]);
            }
        }
        Raster::from_rgba(width, height, pixels).unwrap()
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn png_avatar() -> CropPipeline {
        let mut config = PipelineConfig::avatar();
        config.format = OutputFormat::Png;
        CropPipeline::new(config).unwrap()
    }

    fn decode_png(artifact: &OutputArtifact) -> Raster {
        let img = image::load_from_memory(&artifact.bytes).unwrap().into_rgba8();
        Raster::from_rgba_image(img).unwrap()
    }

    #[test]
    fn test_new_validates_config() {
        let mut config = PipelineConfig::avatar();
        config.quality = 1.5;
        assert_eq!(CropPipeline::new(config), Err(ConfigError::InvalidQuality(1.5)));
    }

    #[test]
    fn test_missing_crop_rect() {
        let pipeline = png_avatar();
        let session = CropSession::from_config(pipeline.config()).unwrap();
        assert_eq!(
            pipeline.run(&numbered(4, 4), &session),
            Err(CropError::Session(SessionError::MissingCropRect))
        );
    }

    #[test]
    fn test_identity_crop_is_pixel_identical() {
        let pipeline = png_avatar();
        let source = numbered(40, 40);
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_crop_rect(CropRect::full(40, 40)).unwrap();

        assert_eq!(pipeline.render(&source, &session).unwrap(), source);
        let artifact = pipeline.run(&source, &session).unwrap();
        assert_eq!(decode_png(&artifact), source);
    }

    #[test]
    fn test_avatar_jpeg_from_landscape() {
        let pipeline = CropPipeline::new(PipelineConfig::avatar()).unwrap();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_crop_rect(CropRect::new(0.0, 0.0, 600.0, 600.0)).unwrap();

        let artifact = pipeline.run(&numbered(800, 600), &session).unwrap();
        assert!(OutputFormat::Jpeg.has_signature(&artifact.bytes));
        assert_eq!(artifact.mime_type, "image/jpeg");
        assert_eq!((artifact.width, artifact.height), (600, 600));
        assert_eq!(artifact.quality_used, 0.95);
        assert_eq!(artifact.suggested_filename, "avatar.jpg");

        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (600, 600));
    }

    #[test]
    fn test_quarter_turn_crop_matches_rotated_square() {
        let pipeline = png_avatar();
        let source = numbered(400, 300);
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_rotation(90.0).unwrap();
        assert_eq!(session.composite_size(400, 300), (300, 400));
        session.set_crop_rect(CropRect::new(0.0, 0.0, 300.0, 300.0)).unwrap();

        let cropped = pipeline.render(&source, &session).unwrap();
        assert_eq!(cropped.dimensions(), (300, 300));
        for y in 0..300 {
            for x in 0..300 {
                // clockwise: output (x, y) comes from source (y, 299 - x)
                assert_eq!(cropped.pixel(x, y), source.pixel(y, 299 - x), "at ({}, {})", x, y);
            }
        }

        let artifact = pipeline.run(&source, &session).unwrap();
        assert_eq!(decode_png(&artifact), cropped);
    }

    #[test]
    fn test_full_turn_equals_no_rotation() {
        let pipeline = png_avatar();
        let source = numbered(30, 20);
        let rect = CropRect::new(5.0, 2.0, 15.0, 15.0);

        let mut unrotated = CropSession::from_config(pipeline.config()).unwrap();
        unrotated.set_crop_rect(rect).unwrap();
        let mut full_turn = CropSession::from_config(pipeline.config()).unwrap();
        full_turn.set_rotation(360.0).unwrap();
        full_turn.set_crop_rect(rect).unwrap();

        assert_eq!(
            pipeline.render(&source, &full_turn).unwrap(),
            pipeline.render(&source, &unrotated).unwrap()
        );
    }

    #[test]
    fn test_out_of_bounds_rect_is_rejected() {
        let pipeline = png_avatar();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_crop_rect(CropRect::new(1.0, 0.0, 40.0, 40.0)).unwrap();
        let err = pipeline.run(&numbered(40, 40), &session).unwrap_err();
        assert!(matches!(err, CropError::OutOfBounds(_)));
        assert!(!err.resets_session());
    }

    #[test]
    fn test_composite_limit_surfaces_as_composite_error() {
        let mut config = PipelineConfig::avatar();
        config.limits.max_dimension = 50;
        let pipeline = CropPipeline::new(config).unwrap();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_rotation(45.0).unwrap();
        session.set_crop_rect(CropRect::new(0.0, 0.0, 10.0, 10.0)).unwrap();

        // 40x40 at 45 degrees needs a 57x57 composite
        let err = pipeline.run(&numbered(40, 40), &session).unwrap_err();
        assert!(matches!(err, CropError::Composite(_)));
    }

    #[test]
    fn test_rotated_jpeg_corners_use_fill() {
        let pipeline = CropPipeline::new(PipelineConfig::avatar()).unwrap();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_rotation(45.0).unwrap();
        let rect = session.fit_crop_rect(64, 64);

        let source = Raster::filled(64, 64, [0, 0, 0, 255]).unwrap();
        let artifact = pipeline.run(&source, &session).unwrap();
        assert_eq!(artifact.width, rect.output_size().0);

        let decoded = image::load_from_memory(&artifact.bytes).unwrap().into_rgb8();
        let corner = decoded.get_pixel(1, 1).0;
        assert!(corner.iter().all(|&c| c > 230), "corner {:?} should be white", corner);
    }

    #[test]
    fn test_stage_events_are_logged_once() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .finish(),
        );

        let pipeline = png_avatar();
        let mut session = CropSession::from_config(pipeline.config()).unwrap();
        session.set_rotation(30.0).unwrap();
        session.fit_crop_rect(40, 30);
        pipeline.run(&numbered(40, 30), &session).unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("composited source").count(), 1, "{}", output);
        assert_eq!(output.matches("extracted crop").count(), 1, "{}", output);
    }
}
