//! Wisata Core - shared logic of the tourism-village admin dashboard
//!
//! Two small utilities sit under every screen of the dashboard:
//!
//! - [`export`] turns a photo picked in the upload dialog into the rotated,
//!   cropped JPEG that gets uploaded
//! - [`pagination`] decides which page buttons a list view shows
//!
//! The remaining modules support them: [`decode`] and [`encode`] move between
//! file bytes and RGB rasters, [`transform`] holds the rotation and paste
//! primitives, and [`upload`] is the state record of the photo dialog.
//!
//! The crate logs through `tracing` and never installs a subscriber; the
//! host application decides where events go.

pub mod decode;
pub mod encode;
pub mod export;
pub mod pagination;
pub mod transform;
pub mod upload;

pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{encode_image, EncodeError};
#[cfg(feature = "async")]
pub use export::export_crop_async;
pub use export::{
    export_crop, export_crop_bytes, export_crop_with, render_crop, CropError, ExportOptions,
};
pub use pagination::{compute_window, Navigation, PageWindow, Pagination, WindowItem};
pub use transform::{CropRegion, InterpolationFilter};
pub use upload::{AspectRatio, CropShape, PhotoEditor, UploadError};
