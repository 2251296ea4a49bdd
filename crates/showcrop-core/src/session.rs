//! Crop session state: zoom, rotation, pan, aspect ratio and crop rectangle.
//!
//! A [`CropSession`] is a plain value object. The interactive controller
//! writes the slider results into it and the pipeline reads it; nothing
//! here renders or touches widget state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::editor::EditState;
use crate::transform::{normalize_rotation, rotated_bounds, CropRect};

/// Smallest zoom: the source exactly covers the viewport.
pub const MIN_ZOOM: f64 = 1.0;
/// Largest zoom.
pub const MAX_ZOOM: f64 = 3.0;
/// Relative tolerance between a crop rectangle's ratio and the session's.
///
/// Controllers snap rectangles to whole pixels, which moves the ratio a
/// little (301x169 is 1.781 against 16:9 = 1.778).
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Errors from invalid session input or editor transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Zoom {0} is outside [1, 3]")]
    ZoomOutOfRange(f64),

    #[error("Rotation {0} is not a finite angle")]
    InvalidRotation(f64),

    #[error("Pan offset ({0}, {1}) is not finite")]
    InvalidPan(f64, f64),

    #[error("Aspect ratio {0} must be a positive finite number")]
    InvalidAspectRatio(f64),

    #[error("Aspect ratio is locked for this session")]
    AspectRatioLocked,

    #[error("Aspect ratio {0} is not one of the available presets")]
    AspectRatioNotPreset(f64),

    #[error("Crop rectangle {rect} is not a valid rectangle")]
    InvalidCropRect { rect: CropRect },

    #[error("Crop rectangle ratio {actual} does not match aspect ratio {expected}")]
    AspectMismatch { expected: f64, actual: f64 },

    #[error("No crop rectangle has been set since the last rotation or aspect change")]
    MissingCropRect,

    #[error("Cannot {action} while the editor is {from}")]
    InvalidTransition {
        from: EditState,
        action: &'static str,
    },
}

/// How the aspect ratio may change during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AspectPolicy {
    /// Fixed for the session's lifetime (avatars).
    Locked,
    /// Selectable from a list of ratios (showcase covers).
    Presets(Vec<f64>),
}

impl Default for AspectPolicy {
    fn default() -> Self {
        AspectPolicy::Presets(vec![16.0 / 9.0, 4.0 / 3.0, 3.0 / 2.0, 1.0])
    }
}

impl AspectPolicy {
    /// Whether `ratio` can be selected under this policy.
    pub fn allows(&self, ratio: f64) -> bool {
        match self {
            AspectPolicy::Locked => false,
            AspectPolicy::Presets(ratios) => ratios.iter().any(|r| ratios_match(*r, ratio)),
        }
    }
}

/// Shape of the crop guide drawn by the UI.
///
/// Presentation only: the encoded artifact is always the full rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropShape {
    #[default]
    Rect,
    Round,
}

/// Offset of the crop centre from the composite centre, in composite pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

fn ratios_match(expected: f64, actual: f64) -> bool {
    ((actual - expected) / expected).abs() <= ASPECT_TOLERANCE
}

fn validate_ratio(ratio: f64) -> Result<f64, SessionError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(SessionError::InvalidAspectRatio(ratio))
    }
}

/// Editing state for one crop interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSession {
    zoom: f64,
    rotation_deg: f64,
    aspect_ratio: f64,
    aspect_policy: AspectPolicy,
    pan: Pan,
    crop_rect: Option<CropRect>,
    shape: CropShape,
}

impl CropSession {
    /// Start a session at zoom 1, no rotation and a centred pan.
    pub fn new(
        aspect_ratio: f64,
        aspect_policy: AspectPolicy,
        shape: CropShape,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            zoom: MIN_ZOOM,
            rotation_deg: 0.0,
            aspect_ratio: validate_ratio(aspect_ratio)?,
            aspect_policy,
            pan: Pan::default(),
            crop_rect: None,
            shape,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, SessionError> {
        Self::new(
            config.default_aspect_ratio,
            config.aspect_policy.clone(),
            config.shape,
        )
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), SessionError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(SessionError::ZoomOutOfRange(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Rotation in degrees, always within `[0, 360)`.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Set the rotation. The angle is wrapped into `[0, 360)`.
    ///
    /// A changed rotation produces a differently sized composite, so any
    /// crop rectangle is cleared and must be re-derived.
    pub fn set_rotation(&mut self, rotation_deg: f64) -> Result<(), SessionError> {
        if !rotation_deg.is_finite() {
            return Err(SessionError::InvalidRotation(rotation_deg));
        }
        let normalized = normalize_rotation(rotation_deg);
        if normalized != self.rotation_deg {
            self.rotation_deg = normalized;
            self.crop_rect = None;
        }
        Ok(())
    }

    /// Rotate relative to the current angle, e.g. the 90° rotate buttons.
    pub fn rotate_by(&mut self, delta_deg: f64) -> Result<(), SessionError> {
        self.set_rotation(self.rotation_deg + delta_deg)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn aspect_policy(&self) -> &AspectPolicy {
        &self.aspect_policy
    }

    /// Select another aspect ratio preset. Clears the crop rectangle when the
    /// ratio changes.
    pub fn set_aspect_ratio(&mut self, ratio: f64) -> Result<(), SessionError> {
        let ratio = validate_ratio(ratio)?;
        if ratio == self.aspect_ratio {
            return Ok(());
        }
        match &self.aspect_policy {
            AspectPolicy::Locked => Err(SessionError::AspectRatioLocked),
            policy if !policy.allows(ratio) => Err(SessionError::AspectRatioNotPreset(ratio)),
            _ => {
                self.aspect_ratio = ratio;
                self.crop_rect = None;
                Ok(())
            }
        }
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), SessionError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(SessionError::InvalidPan(x, y));
        }
        self.pan = Pan { x, y };
        Ok(())
    }

    pub fn shape(&self) -> CropShape {
        self.shape
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop_rect
    }

    /// Set the crop rectangle reported by the controller.
    ///
    /// The rectangle must be well formed and match the session's aspect
    /// ratio within [`ASPECT_TOLERANCE`]. Containment in the composite is
    /// checked when the crop is extracted.
    pub fn set_crop_rect(&mut self, rect: CropRect) -> Result<(), SessionError> {
        if !rect.is_well_formed() {
            return Err(SessionError::InvalidCropRect { rect });
        }
        let actual = rect.aspect_ratio();
        if !ratios_match(self.aspect_ratio, actual) {
            return Err(SessionError::AspectMismatch {
                expected: self.aspect_ratio,
                actual,
            });
        }
        self.crop_rect = Some(rect);
        Ok(())
    }

    pub fn clear_crop_rect(&mut self) {
        self.crop_rect = None;
    }

    /// Size of the composite this session's rectangle refers to.
    pub fn composite_size(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        rotated_bounds(source_width, source_height, self.rotation_deg)
    }

    /// Derive and store a crop rectangle from zoom and pan.
    ///
    /// The rectangle is the largest one of the session's aspect ratio that
    /// fits the composite, divided by the zoom, centred on the composite
    /// centre plus the pan. The pan is clamped so the rectangle stays
    /// inside the composite, and the clamped value is stored back.
    pub fn fit_crop_rect(&mut self, source_width: u32, source_height: u32) -> CropRect {
        let (cw, ch) = self.composite_size(source_width, source_height);
        let (cw, ch) = (f64::from(cw), f64::from(ch));

        let (base_w, base_h) = if cw / ch > self.aspect_ratio {
            (ch * self.aspect_ratio, ch)
        } else {
            (cw, cw / self.aspect_ratio)
        };
        // the ratio round trip can overshoot the composite by an ulp
        let width = (base_w / self.zoom).min(cw);
        let height = (base_h / self.zoom).min(ch);

        let cx = (cw / 2.0 + self.pan.x).clamp(width / 2.0, cw - width / 2.0);
        let cy = (ch / 2.0 + self.pan.y).clamp(height / 2.0, ch - height / 2.0);
        self.pan = Pan {
            x: cx - cw / 2.0,
            y: cy - ch / 2.0,
        };

        let rect = CropRect::new(cx - width / 2.0, cy - height / 2.0, width, height);
        self.crop_rect = Some(rect);
        rect
    }
}
