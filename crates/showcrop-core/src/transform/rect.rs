//! Crop rectangles in composite pixel coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slack allowed when comparing rectangle edges to composite bounds.
///
/// Only absorbs float noise from rectangle arithmetic; it is far below one
/// pixel so a rectangle that overshoots by a real pixel is still rejected.
pub const EDGE_EPSILON: f64 = 1e-6;

/// An axis-aligned rectangle in the coordinate space of the rotated
/// composite. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering a whole `width x height` buffer.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// All four components are finite and the size is positive.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Whether the rectangle lies within `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.is_well_formed()
            && self.x >= -EDGE_EPSILON
            && self.y >= -EDGE_EPSILON
            && self.right() <= f64::from(width) + EDGE_EPSILON
            && self.bottom() <= f64::from(height) + EDGE_EPSILON
    }

    /// Whether origin and size sit on whole pixels.
    pub fn is_pixel_aligned(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| (v - v.round()).abs() <= EDGE_EPSILON)
    }

    /// Output raster size for this rectangle.
    ///
    /// Each side is rounded half away from zero (`f64::round`), with a
    /// minimum of one pixel.
    pub fn output_size(&self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x: {}, y: {}, w: {}, h: {}}}",
            self.x, self.y, self.width, self.height
        )
    }
}
