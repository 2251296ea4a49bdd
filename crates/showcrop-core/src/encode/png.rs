//! PNG encoding, for hosts that want transparent composite corners kept.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{EncodeError, OutputFormat};
use crate::raster::Raster;

/// Encode an RGBA raster to PNG bytes.
pub fn encode_png(image: &Raster) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            image.pixels(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            reason: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature_and_round_trip() {
        let img = Raster::filled(3, 2, [5, 6, 7, 100]).unwrap();
        let bytes = encode_png(&img).unwrap();
        assert!(OutputFormat::Png.has_signature(&bytes));

        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [5, 6, 7, 100]);
    }
}
