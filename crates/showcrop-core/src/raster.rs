//! In-memory RGBA raster shared by every pipeline stage.

/// Bytes per pixel (RGBA8).
pub const CHANNELS: usize = 4;

/// An immutable grid of RGBA8 pixels.
///
/// A raster always has `width >= 1` and `height >= 1`, and its pixel buffer is
/// exactly `width * height * 4` bytes in row-major order. Colour channels are
/// stored straight (not premultiplied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from RGBA pixel data.
    ///
    /// Returns `None` if either dimension is zero or the buffer length does
    /// not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(CHANNELS)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a raster filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Option<Self> {
        let count = (width as usize).checked_mul(height as usize)?;
        let pixels = rgba.repeat(count);
        Self::from_rgba(width, height, pixels)
    }

    /// Create a raster from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Option<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage` for codec and imageops work.
    ///
    /// Note: This clones the pixel data.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the raster and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Sample the pixel at integer coordinates.
    ///
    /// Returns `None` outside the raster.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.pixels[idx..idx + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(CHANNELS).all(|p| p[3] == 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_valid() {
        let raster = Raster::from_rgba(4, 2, vec![0u8; 4 * 2 * 4]).unwrap();
        assert_eq!(raster.dimensions(), (4, 2));
        assert_eq!(raster.pixel_count(), 8);
    }

    #[test]
    fn test_from_rgba_rejects_zero_dimensions() {
        assert!(Raster::from_rgba(0, 10, vec![]).is_none());
        assert!(Raster::from_rgba(10, 0, vec![]).is_none());
    }

    #[test]
    fn test_from_rgba_rejects_length_mismatch() {
        assert!(Raster::from_rgba(2, 2, vec![0u8; 15]).is_none());
        assert!(Raster::from_rgba(2, 2, vec![0u8; 17]).is_none());
    }

    #[test]
    fn test_pixel_lookup() {
        let mut pixels = vec![0u8; 3 * 2 * 4];
        // (2, 1) is the last pixel
        pixels[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let raster = Raster::from_rgba(3, 2, pixels).unwrap();

        assert_eq!(raster.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(3, 0), None);
        assert_eq!(raster.pixel(0, 2), None);
    }

    #[test]
    fn test_filled_and_opaque() {
        let raster = Raster::filled(5, 5, [10, 20, 30, 255]).unwrap();
        assert!(raster.is_opaque());
        assert_eq!(raster.pixel(4, 4), Some([10, 20, 30, 255]));

        let clear = Raster::filled(1, 1, [0, 0, 0, 0]).unwrap();
        assert!(!clear.is_opaque());
    }

    #[test]
    fn test_rgba_image_round_trip_preserves_dimensions() {
        let raster = Raster::filled(7, 3, [9, 9, 9, 255]).unwrap();
        let img = raster.to_rgba_image();
        assert_eq!(img.dimensions(), (7, 3));
        assert_eq!(Raster::from_rgba_image(img).unwrap(), raster);
    }
}
