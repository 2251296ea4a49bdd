//! Crop extraction from a composite.
//!
//! Unlike a clamping crop, extraction refuses rectangles that leave the
//! composite: shrinking the rectangle to fit would silently change its
//! aspect ratio.

use thiserror::Error;

use super::rect::CropRect;
use super::sample::{sample_bilinear, Edge};
use crate::raster::{Raster, CHANNELS};

/// The requested rectangle is malformed or not inside the composite.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Crop rectangle {rect} is outside the {bounds_width}x{bounds_height} composite")]
pub struct CropOutOfBoundsError {
    pub rect: CropRect,
    pub bounds_width: u32,
    pub bounds_height: u32,
}

/// Copy `rect` out of `composite` as a new raster.
///
/// The output is exactly `round(rect.width) x round(rect.height)` pixels.
/// Pixel-aligned rectangles are copied verbatim; sub-pixel rectangles are
/// resampled with bilinear interpolation.
pub fn extract(composite: &Raster, rect: &CropRect) -> Result<Raster, CropOutOfBoundsError> {
    let (bounds_width, bounds_height) = composite.dimensions();
    if !rect.fits_within(bounds_width, bounds_height) {
        return Err(CropOutOfBoundsError {
            rect: *rect,
            bounds_width,
            bounds_height,
        });
    }

    let (out_w, out_h) = rect.output_size();
    let pixels = if rect.is_pixel_aligned() {
        copy_region(composite, rect, out_w, out_h)
    } else {
        resample_region(composite, rect, out_w, out_h)
    };

    tracing::debug!(%rect, width = out_w, height = out_h, "extracted crop");

    Raster::from_rgba(out_w, out_h, pixels).ok_or(CropOutOfBoundsError {
        rect: *rect,
        bounds_width,
        bounds_height,
    })
}

fn copy_region(image: &Raster, rect: &CropRect, out_w: u32, out_h: u32) -> Vec<u8> {
    // a sub-pixel rect on the far edge still yields one pixel, so pull it back inside
    let max_left = image.width().saturating_sub(out_w) as usize;
    let max_top = image.height().saturating_sub(out_h) as usize;
    let left = (rect.x.round().max(0.0) as usize).min(max_left);
    let top = (rect.y.round().max(0.0) as usize).min(max_top);
    let stride = image.width() as usize * CHANNELS;
    let row_len = out_w as usize * CHANNELS;
    let src = image.pixels();

    let mut output = Vec::with_capacity(row_len * out_h as usize);
    for y in 0..out_h as usize {
        let start = (top + y) * stride + left * CHANNELS;
        output.extend_from_slice(&src[start..start + row_len]);
    }
    output
}

fn resample_region(image: &Raster, rect: &CropRect, out_w: u32, out_h: u32) -> Vec<u8> {
    let scale_x = rect.width / f64::from(out_w);
    let scale_y = rect.height / f64::from(out_h);

    let mut output = Vec::with_capacity(out_w as usize * out_h as usize * CHANNELS);
    for y in 0..out_h {
        let src_y = rect.y + (f64::from(y) + 0.5) * scale_y - 0.5;
        for x in 0..out_w {
            let src_x = rect.x + (f64::from(x) + 0.5) * scale_x - 0.5;
            output.extend_from_slice(&sample_bilinear(image, src_x, src_y, Edge::Clamp));
        }
    }
    output
}
