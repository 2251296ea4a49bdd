use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::session::SessionError;
use crate::transform::{CompositeError, CropOutOfBoundsError};

pub type CropResult<T> = Result<T, CropError>;

/// Any failure of the crop flow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CropError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("composite error: {0}")]
    Composite(#[from] CompositeError),

    #[error("extract error: {0}")]
    OutOfBounds(#[from] CropOutOfBoundsError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl CropError {
    /// Short name of the error kind, e.g. for a JavaScript `Error.name`.
    pub fn kind(&self) -> &'static str {
        match self {
            CropError::Decode(_) => "DecodeError",
            CropError::Composite(_) => "CompositeError",
            CropError::OutOfBounds(_) => "CropOutOfBoundsError",
            CropError::Encode(_) => "EncodeError",
            CropError::Session(_) => "SessionError",
            CropError::Config(_) => "ConfigError",
        }
    }

    /// Message suitable for showing to the person editing the image.
    ///
    /// Technical detail stays in `Display`; this text only depends on the
    /// kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CropError::Decode(DecodeError::Unreachable(_)) => {
                "The image could not be downloaded. Check the link and try again."
            }
            CropError::Decode(DecodeError::CrossOrigin(_)) => {
                "That image's host does not allow it to be edited here. Download it and upload the file instead."
            }
            CropError::Decode(_) => {
                "This file could not be read as an image. Please choose a JPEG, PNG or WebP file."
            }
            CropError::Composite(CompositeError::InvalidAngle(_)) => {
                "The rotation angle is not valid. Reset the rotation and try again."
            }
            CropError::Composite(_) => {
                "The image is too large to rotate. Pick a smaller image or reduce the zoom."
            }
            CropError::OutOfBounds(_) => {
                "The crop area extends past the edge of the image. Adjust the crop and try again."
            }
            CropError::Encode(_) => "The cropped image could not be saved. Please try again.",
            CropError::Session(_) => "That crop setting is not available.",
            CropError::Config(_) => "The image editor is misconfigured.",
        }
    }

    /// Whether the editor discards the loaded image after this error.
    ///
    /// Only decode failures do; every other error keeps zoom, rotation and
    /// pan so the user can adjust and apply again.
    pub fn resets_session(&self) -> bool {
        matches!(self, CropError::Decode(_))
    }

    /// Whether the user can sensibly retry the action that failed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CropError::Session(_) | CropError::Config(_))
    }
}
