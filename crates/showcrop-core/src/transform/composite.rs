//! Rotation compositing.
//!
//! The source is drawn into a fresh buffer sized to its rotated bounding box,
//! rotated about its own centre, with the source centre on the buffer centre.
//!
//! # Algorithm
//!
//! Quarter turns are exact pixel permutations. Any other angle uses inverse
//! mapping: for each output pixel centre we rotate back by -θ into source
//! space and sample with bilinear interpolation. In y-down pixel space a
//! clockwise rotation by θ has the inverse
//!
//! ```text
//! src_x =  dx * cos θ + dy * sin θ + src_cx
//! src_y = -dx * sin θ + dy * cos θ + src_cy
//! ```
//!
//! where `(dx, dy)` is the output pixel centre relative to the buffer centre.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bounds::{normalize_rotation, quarter_turns, rotated_bounds};
use super::sample::{sample_bilinear, Edge};
use crate::raster::{Raster, CHANNELS};

/// Fill for the composite's corners not covered by the rotated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Background {
    /// Fully transparent, for alpha-capable output formats.
    #[default]
    Transparent,
    /// An opaque colour, for formats without alpha.
    Fill([u8; 3]),
}

impl Background {
    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Background::Transparent => [0, 0, 0, 0],
            Background::Fill([r, g, b]) => [r, g, b, 255],
        }
    }
}

/// Size ceilings for composite buffers.
///
/// The defaults match the largest canvas common browsers will allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositeLimits {
    /// Longest allowed side in pixels.
    pub max_dimension: u32,
    /// Largest allowed area in pixels.
    pub max_pixels: u64,
}

impl Default for CompositeLimits {
    fn default() -> Self {
        Self {
            max_dimension: 32_767,
            max_pixels: 268_435_456,
        }
    }
}

/// Errors that can occur while compositing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositeError {
    /// NaN or infinite rotation; there is no bounding box to draw into.
    #[error("Rotation angle {0} is not finite")]
    InvalidAngle(f64),

    /// The rotated bounding box exceeds the configured limits.
    #[error("Composite of {width}x{height} exceeds the size limit")]
    TooLarge { width: u32, height: u32 },

    /// The allocator refused the buffer.
    #[error("Failed to allocate {bytes} bytes for the composite")]
    AllocationFailed { bytes: usize },
}

/// Allocate an empty pixel buffer for a `width x height` raster.
pub(crate) fn alloc_pixels(
    width: u32,
    height: u32,
    limits: &CompositeLimits,
) -> Result<Vec<u8>, CompositeError> {
    let too_large = CompositeError::TooLarge { width, height };
    if width > limits.max_dimension
        || height > limits.max_dimension
        || u64::from(width) * u64::from(height) > limits.max_pixels
    {
        return Err(too_large);
    }

    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(too_large)?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(bytes)
        .map_err(|_| CompositeError::AllocationFailed { bytes })?;
    Ok(pixels)
}

/// Render `image` rotated by `angle_degrees` into its bounding-box buffer.
///
/// A new buffer is allocated on every call; nothing is pooled or reused.
/// Non-finite angles are rejected with [`CompositeError::InvalidAngle`].
pub fn composite(
    image: &Raster,
    angle_degrees: f64,
    background: Background,
    limits: &CompositeLimits,
) -> Result<Raster, CompositeError> {
    if !angle_degrees.is_finite() {
        return Err(CompositeError::InvalidAngle(angle_degrees));
    }
    let (dst_w, dst_h) = rotated_bounds(image.width(), image.height(), angle_degrees);
    let mut output = alloc_pixels(dst_w, dst_h, limits)?;

    match quarter_turns(angle_degrees) {
        Some(turns) => write_quarter_turns(image, turns, dst_w, dst_h, &mut output),
        None => write_rotated(image, angle_degrees, background, dst_w, dst_h, &mut output),
    }

    tracing::debug!(
        angle = angle_degrees,
        src_width = image.width(),
        src_height = image.height(),
        width = dst_w,
        height = dst_h,
        "composited source"
    );

    Raster::from_rgba(dst_w, dst_h, output).ok_or(CompositeError::TooLarge {
        width: dst_w,
        height: dst_h,
    })
}

fn write_quarter_turns(image: &Raster, turns: u8, dst_w: u32, dst_h: u32, output: &mut Vec<u8>) {
    let (src_w, src_h) = image.dimensions();
    let src = image.pixels();

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let (sx, sy) = match turns {
                0 => (dx, dy),
                1 => (dy, src_h - 1 - dx),
                2 => (src_w - 1 - dx, src_h - 1 - dy),
                _ => (src_w - 1 - dy, dx),
            };
            let idx = (sy as usize * src_w as usize + sx as usize) * CHANNELS;
            output.extend_from_slice(&src[idx..idx + CHANNELS]);
        }
    }
}

fn write_rotated(
    image: &Raster,
    angle_degrees: f64,
    background: Background,
    dst_w: u32,
    dst_h: u32,
    output: &mut Vec<u8>,
) {
    let angle_rad = normalize_rotation(angle_degrees).to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = f64::from(image.width()) / 2.0;
    let src_cy = f64::from(image.height()) / 2.0;
    let dst_cx = f64::from(dst_w) / 2.0;
    let dst_cy = f64::from(dst_h) / 2.0;
    let edge = Edge::Fill(background.to_rgba());

    for dst_y in 0..dst_h {
        let dy = f64::from(dst_y) + 0.5 - dst_cy;
        for dst_x in 0..dst_w {
            let dx = f64::from(dst_x) + 0.5 - dst_cx;

            // continuous source position, then shift to pixel-index space
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            output.extend_from_slice(&sample_bilinear(image, src_x, src_y, edge));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each pixel encodes its own position: R = x, G = y.
    fn coord_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        Raster::from_rgba(width, height, pixels).unwrap()
    }

    fn run(image: &Raster, angle: f64) -> Raster {
        composite(image, angle, Background::Transparent, &CompositeLimits::default()).unwrap()
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let img = coord_image(9, 5);
        assert_eq!(run(&img, 0.0), img);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let img = coord_image(9, 5);
        assert_eq!(run(&img, 360.0), run(&img, 0.0));
    }

    #[test]
    fn test_90_clockwise() {
        // 3x2 source:      after 90 CW (2x3):
        //  (0,0) (1,0) (2,0)     (0,1) (0,0)
        //  (0,1) (1,1) (2,1)     (1,1) (1,0)
        //                        (2,1) (2,0)
        let out = run(&coord_image(3, 2), 90.0);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.pixel(0, 0), Some([0, 1, 7, 255]));
        assert_eq!(out.pixel(1, 0), Some([0, 0, 7, 255]));
        assert_eq!(out.pixel(0, 2), Some([2, 1, 7, 255]));
        assert_eq!(out.pixel(1, 2), Some([2, 0, 7, 255]));
    }

    #[test]
    fn test_180() {
        let out = run(&coord_image(3, 2), 180.0);
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.pixel(0, 0), Some([2, 1, 7, 255]));
        assert_eq!(out.pixel(2, 1), Some([0, 0, 7, 255]));
    }

    #[test]
    fn test_270_is_counter_clockwise_quarter() {
        let out = run(&coord_image(3, 2), 270.0);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.pixel(0, 0), Some([2, 0, 7, 255]));
        assert_eq!(out.pixel(1, 0), Some([2, 1, 7, 255]));
        assert_eq!(out.pixel(0, 2), Some([0, 0, 7, 255]));
    }

    #[test]
    fn test_four_quarter_turns_round_trip() {
        let img = coord_image(5, 3);
        let mut out = img.clone();
        for _ in 0..4 {
            out = run(&out, 90.0);
        }
        assert_eq!(out, img);
    }

    #[test]
    fn test_45_degree_corners_take_background() {
        let img = Raster::filled(20, 20, [255, 0, 0, 255]).unwrap();

        let clear = run(&img, 45.0);
        assert_eq!(clear.dimensions(), (29, 29));
        assert_eq!(clear.pixel(0, 0), Some([0, 0, 0, 0]));
        // centre is fully covered
        assert_eq!(clear.pixel(14, 14), Some([255, 0, 0, 255]));

        let filled = composite(
            &img,
            45.0,
            Background::Fill([0, 0, 255]),
            &CompositeLimits::default(),
        )
        .unwrap();
        assert_eq!(filled.pixel(0, 0), Some([0, 0, 255, 255]));
        assert!(filled.is_opaque());
    }

    #[test]
    fn test_rotation_keeps_centre_on_centre() {
        // bright 3x3 block at the centre of a dark 21x21 image
        let mut pixels = vec![0u8; 21 * 21 * 4];
        for p in pixels.chunks_exact_mut(4) {
            p[3] = 255;
        }
        for y in 9..12 {
            for x in 9..12 {
                let idx = (y * 21 + x) * 4;
                pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let img = Raster::from_rgba(21, 21, pixels).unwrap();

        let out = run(&img, 30.0);
        let (w, h) = out.dimensions();
        let centre = out.pixel(w / 2, h / 2).unwrap();
        assert!(centre[0] > 200, "centre pixel was {:?}", centre);
    }

    #[test]
    fn test_too_large_is_rejected() {
        let img = Raster::filled(10, 10, [0, 0, 0, 255]).unwrap();
        let limits = CompositeLimits {
            max_dimension: 12,
            max_pixels: 1_000,
        };
        // 45 degrees needs 15x15
        assert_eq!(
            composite(&img, 45.0, Background::Transparent, &limits),
            Err(CompositeError::TooLarge {
                width: 15,
                height: 15
            })
        );
        assert!(composite(&img, 0.0, Background::Transparent, &limits).is_ok());

        let area_limited = CompositeLimits {
            max_dimension: 100,
            max_pixels: 99,
        };
        assert!(matches!(
            composite(&img, 0.0, Background::Transparent, &area_limited),
            Err(CompositeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_non_finite_angle_is_rejected() {
        let img = Raster::filled(40, 30, [10, 20, 30, 255]).unwrap();
        for angle in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = composite(&img, angle, Background::Transparent, &CompositeLimits::default())
                .unwrap_err();
            let CompositeError::InvalidAngle(rejected) = err else {
                panic!("expected InvalidAngle, got {:?}", err);
            };
            assert_eq!(rejected.to_bits(), angle.to_bits());
        }
        assert_eq!(
            CompositeError::InvalidAngle(f64::INFINITY).to_string(),
            "Rotation angle inf is not finite"
        );
    }

    #[test]
    fn test_background_to_rgba() {
        assert_eq!(Background::Transparent.to_rgba(), [0, 0, 0, 0]);
        assert_eq!(Background::Fill([1, 2, 3]).to_rgba(), [1, 2, 3, 255]);
    }

    #[test]
    fn test_1x1_rotation() {
        let img = Raster::filled(1, 1, [128, 128, 128, 255]).unwrap();
        let out = run(&img, 45.0);
        assert_eq!(out.dimensions(), (2, 2));
    }
}
