//! Image transformation primitives used by the crop exporter.
//!
//! # Pipeline Order
//!
//! 1. Rotate the source into a square safe-area buffer (rotation baked in)
//! 2. Paste that buffer into an output of exactly the crop size
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise (y axis points down)
//! - Crop coordinates are whole pixels in the source's native resolution
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{paste_into, CropRegion};
pub use rotation::{
    is_identity_rotation, normalize_angle, render_safe_area, InterpolationFilter, SafeArea,
};
