//! Rotated bounding-box geometry.
//!
//! Angles are in degrees, positive = clockwise on a y-down raster (the way a
//! canvas `rotate` transform turns the drawing).

/// Wrap an angle into `[0, 360)`.
///
/// Non-finite input is returned unchanged; callers validate it.
pub fn normalize_rotation(angle_degrees: f64) -> f64 {
    let wrapped = angle_degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Number of clockwise quarter turns if the angle is an exact multiple of 90°.
pub fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let angle = normalize_rotation(angle_degrees);
    if angle % 90.0 == 0.0 {
        Some((angle / 90.0) as u8)
    } else {
        None
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// ```text
/// new_w = ceil(w * |cos θ| + h * |sin θ|)
/// new_h = ceil(w * |sin θ| + h * |cos θ|)
/// ```
///
/// Both sides are rounded up so the box always contains every corner of the
/// rotated source. Exact multiples of 90° skip the trig and return the
/// source dimensions (swapped for 90° and 270°), so there is no 1-pixel
/// drift from `cos(π/2) != 0` in floating point.
///
/// The angle must be finite. NaN or infinite angles have no meaningful box
/// and come back as `(1, 1)`; [`composite`](super::composite) rejects them
/// before sizing its buffer.
///
/// # Example
///
/// ```
/// use showcrop_core::transform::rotated_bounds;
///
/// assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
/// assert_eq!(rotated_bounds(100, 50, 360.0), (100, 50));
/// ```
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 0 {
            (width, height)
        } else {
            (height, width)
        };
    }

    let angle_rad = normalize_rotation(angle_degrees).to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = f64::from(width);
    let h = f64::from(height);

    let new_w = (w * cos + h * sin).ceil() as u32;
    let new_h = (w * sin + h * cos).ceil() as u32;

    (new_w.max(1), new_h.max(1))
}
