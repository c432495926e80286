//! Image decoding for the crop exporter.
//!
//! Uploaded photos arrive as encoded bytes (usually JPEG, sometimes PNG).
//! They are decoded to RGB8 with the EXIF orientation applied, matching what
//! a browser shows the user while they pick the crop region.
//!
//! # Examples
//!
//! ```ignore
//! use wisata_core::decode::decode_image;
//!
//! let bytes = std::fs::read("homestay.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod raster;
mod types;

pub use raster::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
