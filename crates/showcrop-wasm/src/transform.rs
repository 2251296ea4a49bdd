//! WASM bindings for rotation and crop extraction.
//!
//! These are the building blocks the editor uses; they are exposed so a
//! preview canvas can show exactly what `apply` will produce.

use showcrop_core::transform::{
    composite as core_composite, extract as core_extract, normalize_rotation as core_normalize,
    rotated_bounds as core_bounds, Background, CompositeLimits, CropRect,
};
use wasm_bindgen::prelude::*;

use crate::error::{to_js_error, type_error};
use crate::types::JsRaster;

/// Bounding box of a `width x height` image rotated by `angle_degrees`.
///
/// Returns `[width, height]`. Quarter turns are exact; other angles round up.
/// Throws a `TypeError` for `NaN` or infinite angles.
///
/// ```typescript
/// const [w, h] = rotated_bounds(100, 50, 30); // [112, 94]
/// ```
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Result<Vec<u32>, JsValue> {
    if !angle_degrees.is_finite() {
        return Err(type_error("angle must be a finite number of degrees"));
    }
    let (w, h) = core_bounds(width, height, angle_degrees);
    Ok(vec![w, h])
}

/// Wrap an angle into `[0, 360)`.
#[wasm_bindgen]
pub fn normalize_rotation(angle_degrees: f64) -> f64 {
    core_normalize(angle_degrees)
}

/// Draw `image` rotated clockwise by `angle_degrees` into its bounding box.
///
/// # Arguments
///
/// * `image` - Source raster
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
/// * `fill` - Optional `[r, g, b]` for the uncovered corners; transparent if omitted
///
/// Throws a `CompositeError` if the angle is not finite or the buffer would
/// exceed browser canvas limits.
#[wasm_bindgen]
pub fn composite(
    image: &JsRaster,
    angle_degrees: f64,
    fill: Option<Vec<u8>>,
) -> Result<JsRaster, JsValue> {
    let background = match fill.as_deref() {
        None => Background::Transparent,
        Some(&[r, g, b]) => Background::Fill([r, g, b]),
        Some(_) => return Err(type_error("fill must be [r, g, b]")),
    };
    core_composite(
        image.raster(),
        angle_degrees,
        background,
        &CompositeLimits::default(),
    )
    .map(JsRaster::from_raster)
    .map_err(to_js_error)
}

/// Copy a rectangle, in composite pixels, out of a composite.
///
/// The result is exactly `round(width) x round(height)` pixels. Throws a
/// `CropOutOfBoundsError` if the rectangle leaves the image.
#[wasm_bindgen]
pub fn extract(
    image: &JsRaster,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<JsRaster, JsValue> {
    core_extract(image.raster(), &CropRect::new(x, y, width, height))
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extract_out_of_bounds_throws() {
        let img = JsRaster::new(10, 10, vec![0u8; 400]).unwrap();
        let err = extract(&img, 0.0, 0.0, 11.0, 10.0).err().unwrap();
        let err: js_sys::Error = err.unchecked_into();
        assert_eq!(String::from(err.name()), "CropOutOfBoundsError");
    }

    #[wasm_bindgen_test]
    fn test_non_finite_angle_throws() {
        let img = JsRaster::new(4, 3, vec![0u8; 48]).unwrap();
        for angle in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err: js_sys::Error = composite(&img, angle, None).err().unwrap().unchecked_into();
            assert_eq!(String::from(err.name()), "CompositeError");
            assert!(rotated_bounds(4, 3, angle).is_err());
        }
    }

    #[wasm_bindgen_test]
    fn test_bad_fill_throws() {
        let img = JsRaster::new(2, 2, vec![0u8; 16]).unwrap();
        assert!(composite(&img, 10.0, Some(vec![1, 2])).is_err());
    }
}
