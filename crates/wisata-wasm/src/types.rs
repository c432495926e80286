//! WASM-compatible wrapper types for image data.
//!
//! Wraps the core `DecodedImage` so the dashboard can keep a decoded photo in
//! WASM memory between cropper interactions.

use wasm_bindgen::prelude::*;
use wisata_core::decode::DecodedImage;
use wisata_core::transform::InterpolationFilter;

/// A decoded image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`. Call `free()` to release a large photo early; otherwise the
/// wasm-bindgen finalizer cleans up.
#[wasm_bindgen]
pub struct JsDecodedImage {
    inner: DecodedImage,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major).
    ///
    /// Fails when `pixels.length` is not `width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsDecodedImage, JsValue> {
        let inner = DecodedImage {
            width,
            height,
            pixels,
        };
        if !inner.has_consistent_buffer() {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: {} bytes for a {}x{} RGB image",
                inner.pixels.len(),
                width,
                height
            )));
        }
        Ok(Self::from_decoded(inner))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(inner: DecodedImage) -> Self {
        Self { inner }
    }

    pub(crate) fn as_decoded(&self) -> &DecodedImage {
        &self.inner
    }
}

/// Map the JS filter flag to the core filter.
///
/// `1` selects Lanczos3; anything else is bilinear.
pub(crate) fn filter_from_u8(value: u8) -> InterpolationFilter {
    match value {
        1 => InterpolationFilter::Lanczos3,
        _ => InterpolationFilter::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_decoded_image_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8];
        let img = JsDecodedImage::new(2, 1, pixels.clone()).unwrap();
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_from_decoded_shares_buffer() {
        let decoded = DecodedImage::blank(20, 10).unwrap();
        let js_img = JsDecodedImage::from_decoded(decoded.clone());
        assert_eq!(js_img.as_decoded(), &decoded);
        assert_eq!(js_img.byte_length(), 600);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), InterpolationFilter::Bilinear);
        assert_eq!(filter_from_u8(1), InterpolationFilter::Lanczos3);
        assert_eq!(filter_from_u8(7), InterpolationFilter::Bilinear);
    }
}

/// Tests that need a JS host (the error path builds a `JsValue`).
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_rejects_short_buffer() {
        assert!(JsDecodedImage::new(4, 4, vec![0u8; 10]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_overflowing_size() {
        assert!(JsDecodedImage::new(u32::MAX, u32::MAX, vec![]).is_err());
    }
}
