//! Crop export WASM bindings.
//!
//! Called by the photo dialog when the editor presses "Save". The crop
//! rectangle is the pixel area reported by the cropper and the result is the
//! JPEG that gets uploaded.
//!
//! # Example
//!
//! ```typescript
//! import { export_crop } from '@wisata/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const { x, y, width, height } = croppedAreaPixels;
//! const jpeg = export_crop(bytes, x, y, width, height, rotation, { quality: 100 });
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use wasm_bindgen::prelude::*;
use wisata_core::export::{self, CropError, ExportOptions};
use wisata_core::transform::CropRegion;

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Read export options from a JS object; `undefined` and `null` mean defaults.
fn options_from_js(value: JsValue) -> Result<ExportOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ExportOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid export options: {}", e)))
}

/// Decode `bytes`, rotate by `rotation` degrees (clockwise), crop and encode.
///
/// `options` is an optional `{ quality, filter }` object where `filter` is
/// `"bilinear"` or `"lanczos3"`.
///
/// # Errors
///
/// Returns an error string when the bytes cannot be decoded, the region is
/// empty or out of bounds, or encoding fails.
#[wasm_bindgen]
pub fn export_crop(
    bytes: &[u8],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation: f64,
    options: JsValue,
) -> Result<Vec<u8>, JsValue> {
    let options = options_from_js(options)?;
    let crop = CropRegion::new(x, y, width, height);
    export::export_crop_bytes(bytes, &crop, rotation, &options).map_err(to_js_error)
}

/// Crop an image already decoded with `decode_image`.
///
/// `filter` is `0` for bilinear, `1` for Lanczos3.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn export_crop_from_image(
    image: &JsDecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation: f64,
    quality: u8,
    filter: u8,
) -> Result<Vec<u8>, JsValue> {
    export_image(image, CropRegion::new(x, y, width, height), rotation, quality, filter)
        .map_err(to_js_error)
}

/// Rotate and crop without encoding, for an in-page preview of the result.
#[wasm_bindgen]
pub fn render_crop(
    image: &JsDecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation: f64,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    let crop = CropRegion::new(x, y, width, height);
    export::render_crop(image.as_decoded(), &crop, rotation, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

fn export_image(
    image: &JsDecodedImage,
    crop: CropRegion,
    rotation: f64,
    quality: u8,
    filter: u8,
) -> Result<Vec<u8>, CropError> {
    let options = ExportOptions {
        quality,
        filter: filter_from_u8(filter),
    };
    export::export_crop_with(image.as_decoded(), &crop, rotation, &options)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([90, 160, 40]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[wasm_bindgen_test]
    fn test_export_crop_default_options() {
        let jpeg = export_crop(&png_bytes(40, 30), 0, 0, 20, 20, 0.0, JsValue::UNDEFINED).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_export_crop_with_options_object() {
        let options = serde_wasm_bindgen::to_value(&ExportOptions {
            quality: 50,
            ..Default::default()
        })
        .unwrap();
        assert!(export_crop(&png_bytes(40, 30), 0, 0, 20, 20, 30.0, options).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_export_crop_bad_options() {
        let result = export_crop(&png_bytes(8, 8), 0, 0, 4, 4, 0.0, JsValue::from_str("fast"));
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_crop_out_of_bounds() {
        let result = export_crop(&png_bytes(8, 8), 4, 4, 8, 8, 0.0, JsValue::NULL);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_crop_garbage_bytes() {
        let result = export_crop(&[0, 1, 2], 0, 0, 4, 4, 0.0, JsValue::NULL);
        assert!(result.is_err());
    }
}
