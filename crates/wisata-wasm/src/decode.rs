//! Image decoding WASM bindings.
//!
//! The upload dialog decodes a chosen file once and keeps the raster in WASM
//! memory while the cropper is open.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@wisata/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsDecodedImage;
use wasm_bindgen::prelude::*;
use wisata_core::decode;

/// Decode a JPEG or PNG file to RGB, applying its EXIF orientation.
///
/// # Errors
///
/// Returns an error string if the format is not recognised or the file is
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 120, 230]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(7, 3)).unwrap();
        assert_eq!((image.width(), image.height()), (7, 3));
        assert_eq!(&image.pixels()[0..3], &[10, 120, 230]);
    }
}
