//! Bilinear RGBA sampling.
//!
//! Interpolation happens on premultiplied values so that transparent
//! neighbours do not bleed their (meaningless) colour into opaque edges.

use crate::raster::Raster;

/// What a tap outside the raster reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    /// Outside taps read a constant colour.
    Fill([u8; 4]),
    /// Outside taps read the nearest edge pixel.
    Clamp,
}

#[inline]
fn tap(image: &Raster, x: i64, y: i64, edge: Edge) -> [u8; 4] {
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));
    let (x, y) = match edge {
        Edge::Fill(rgba) => {
            if x < 0 || y < 0 || x >= w || y >= h {
                return rgba;
            }
            (x, y)
        }
        Edge::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
    };
    image.pixel(x as u32, y as u32).unwrap_or([0, 0, 0, 0])
}

/// Sample at continuous pixel-index coordinates, where `(0.0, 0.0)` is the
/// centre of the top-left pixel.
pub(crate) fn sample_bilinear(image: &Raster, x: f64, y: f64, edge: Edge) -> [u8; 4] {
    let x0f = x.floor();
    let y0f = y.floor();
    let fx = x - x0f;
    let fy = y - y0f;
    let x0 = x0f as i64;
    let y0 = y0f as i64;

    let taps = [
        (tap(image, x0, y0, edge), (1.0 - fx) * (1.0 - fy)),
        (tap(image, x0 + 1, y0, edge), fx * (1.0 - fy)),
        (tap(image, x0, y0 + 1, edge), (1.0 - fx) * fy),
        (tap(image, x0 + 1, y0 + 1, edge), fx * fy),
    ];

    let mut rgb = [0.0f64; 3];
    let mut alpha = 0.0f64;
    for (p, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        let a = f64::from(p[3]) / 255.0;
        let wa = weight * a;
        rgb[0] += f64::from(p[0]) * wa;
        rgb[1] += f64::from(p[1]) * wa;
        rgb[2] += f64::from(p[2]) * wa;
        alpha += wa;
    }

    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }

    [
        (rgb[0] / alpha).clamp(0.0, 255.0).round() as u8,
        (rgb[1] / alpha).clamp(0.0, 255.0).round() as u8,
        (rgb[2] / alpha).clamp(0.0, 255.0).round() as u8,
        (alpha * 255.0).clamp(0.0, 255.0).round() as u8,
    ]
}
