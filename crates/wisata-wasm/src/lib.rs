//! Wisata WASM - WebAssembly bindings for the admin dashboard
//!
//! Exposes the wisata-core crop exporter and pagination window to the
//! dashboard's TypeScript front end.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for decoded images
//! - `decode` - Decode a chosen file once for the cropper
//! - `export` - Rotate, crop and JPEG-encode for upload
//! - `pagination` - Page-button window and navigation state
//!
//! # Usage
//!
//! ```typescript
//! import init, { export_crop, compute_window } from '@wisata/wasm';
//!
//! await init();
//!
//! const jpeg = export_crop(bytes, area.x, area.y, area.width, area.height, rotation);
//! const window = compute_window(currentPage, maxPage);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod export;
mod pagination;
mod types;

pub use decode::decode_image;
pub use export::{export_crop, export_crop_from_image, render_crop};
pub use pagination::{compute_window, JsPagination};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
