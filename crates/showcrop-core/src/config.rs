//! Pipeline configuration and the avatar/showcase presets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{OutputFormat, DEFAULT_QUALITY};
use crate::session::{AspectPolicy, CropShape};
use crate::transform::{Background, CompositeLimits};

/// Errors from an invalid [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid quality {0}: must be greater than 0 and at most 1")]
    InvalidQuality(f64),

    #[error("Aspect ratio {0} must be a positive finite number")]
    InvalidAspectRatio(f64),

    #[error("Aspect ratio presets must not be empty")]
    EmptyPresets,

    #[error("Default aspect ratio {0} is not one of the presets")]
    DefaultNotInPresets(f64),

    #[error("Filename stem must not be empty")]
    EmptyFilenameStem,

    #[error("Composite limits must be non-zero")]
    InvalidLimits,
}

/// Parameters for one crop flow.
///
/// Avatar and showcase crops run the same engine and differ only in the
/// values here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub format: OutputFormat,
    /// Lossy quality in (0, 1]. Ignored by lossless formats.
    pub quality: f64,
    /// Opaque colour behind transparent pixels for formats without alpha.
    pub fill: [u8; 3],
    pub filename_stem: String,
    pub default_aspect_ratio: f64,
    pub aspect_policy: AspectPolicy,
    pub shape: CropShape,
    pub limits: CompositeLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::showcase()
    }
}

impl PipelineConfig {
    /// Square avatar crop with a round guide and a locked ratio.
    pub fn avatar() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            fill: [255, 255, 255],
            filename_stem: "avatar".to_string(),
            default_aspect_ratio: 1.0,
            aspect_policy: AspectPolicy::Locked,
            shape: CropShape::Round,
            limits: CompositeLimits::default(),
        }
    }

    /// Cover/logo crop, 16:9 by default with a few selectable ratios.
    pub fn showcase() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            fill: [255, 255, 255],
            filename_stem: "showcase".to_string(),
            default_aspect_ratio: 16.0 / 9.0,
            aspect_policy: AspectPolicy::default(),
            shape: CropShape::Rect,
            limits: CompositeLimits::default(),
        }
    }

    /// Background for the corners a rotation uncovers.
    ///
    /// Alpha-capable formats keep them transparent; others get the fill
    /// colour so the corners match the flattening step.
    pub fn background(&self) -> Background {
        if self.format.supports_alpha() {
            Background::Transparent
        } else {
            Background::Fill(self.fill)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(ConfigError::InvalidQuality(self.quality));
        }
        let ratio = self.default_aspect_ratio;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(ratio));
        }
        if let AspectPolicy::Presets(presets) = &self.aspect_policy {
            if presets.is_empty() {
                return Err(ConfigError::EmptyPresets);
            }
            if let Some(bad) = presets.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
                return Err(ConfigError::InvalidAspectRatio(*bad));
            }
            if !self.aspect_policy.allows(ratio) {
                return Err(ConfigError::DefaultNotInPresets(ratio));
            }
        }
        if self.filename_stem.trim().is_empty() {
            return Err(ConfigError::EmptyFilenameStem);
        }
        if self.limits.max_dimension == 0 || self.limits.max_pixels == 0 {
            return Err(ConfigError::InvalidLimits);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::avatar().validate().is_ok());
        assert!(PipelineConfig::showcase().validate().is_ok());
        assert_eq!(PipelineConfig::default(), PipelineConfig::showcase());
    }

    #[test]
    fn test_avatar_preset() {
        let config = PipelineConfig::avatar();
        assert_eq!(config.default_aspect_ratio, 1.0);
        assert_eq!(config.aspect_policy, AspectPolicy::Locked);
        assert_eq!(config.shape, CropShape::Round);
        assert_eq!(config.filename_stem, "avatar");
        assert_eq!(config.quality, 0.95);
    }

    #[test]
    fn test_background_follows_format() {
        let mut config = PipelineConfig::avatar();
        assert_eq!(config.background(), Background::Fill([255, 255, 255]));
        config.format = OutputFormat::Png;
        assert_eq!(config.background(), Background::Transparent);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::showcase();
        config.quality = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidQuality(0.0)));

        let mut config = PipelineConfig::showcase();
        config.default_aspect_ratio = 2.0;
        assert_eq!(config.validate(), Err(ConfigError::DefaultNotInPresets(2.0)));

        let mut config = PipelineConfig::showcase();
        config.aspect_policy = AspectPolicy::Presets(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyPresets));

        let mut config = PipelineConfig::avatar();
        config.default_aspect_ratio = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAspectRatio(_))));

        let mut config = PipelineConfig::avatar();
        config.filename_stem = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyFilenameStem));
    }

    #[test]
    fn test_locked_policy_accepts_any_default_ratio() {
        let mut config = PipelineConfig::avatar();
        config.default_aspect_ratio = 3.0;
        assert!(config.validate().is_ok());
    }
}
