//! Decoding base64 image payloads into a PNG file the SDK can read.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};

use crate::{PrinterError, Result};

/// Fixed file name in document storage. Concurrent prints overwrite it.
pub(crate) const TEMP_IMAGE_FILE_NAME: &str = "test.png";

pub(crate) fn decode_base64(payload: &str) -> Result<DynamicImage> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| PrinterError::ImageDecode(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| PrinterError::ImageDecode(e.to_string()))
}

pub(crate) fn save_png(image: &DynamicImage, path: &Path) -> image::ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    use super::*;

    fn tiny_png_base64() -> String {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        STANDARD.encode(cursor.into_inner())
    }

    #[test]
    fn decodes_png_payload() {
        let image = decode_base64(&tiny_png_base64()).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn rejects_non_base64() {
        assert!(matches!(
            decode_base64("not base64 at all!"),
            Err(PrinterError::ImageDecode(_))
        ));
    }

    #[test]
    fn rejects_base64_that_is_not_an_image() {
        let payload = STANDARD.encode(b"plain text, no pixels");
        assert!(matches!(
            decode_base64(&payload),
            Err(PrinterError::ImageDecode(_))
        ));
    }
}
