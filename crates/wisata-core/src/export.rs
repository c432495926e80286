//! Crop export: rotate, crop and encode an uploaded photo.
//!
//! This is what runs when an editor presses "Save" in the photo dialog. The
//! steps are always performed in the same order:
//!
//! 1. lay out a square safe area of side `2 * (max_side / 2) * sqrt(2)`
//! 2. draw the source rotated about its own centre into that area
//! 3. capture the whole area (the rotation is now baked in)
//! 4. allocate an output of exactly `crop.width x crop.height`
//! 5. paste the captured area so that `(crop.x, crop.y)` lands on `(0, 0)`
//! 6. encode the output as JPEG
//!
//! Rotation happens about the *image* centre, not the crop centre. The crop
//! region is always expressed in the unrotated source's pixel frame, so it
//! must fit inside `width x height` of the source whatever the angle.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_image, EncodeError, MAX_QUALITY};
use crate::transform::{
    is_identity_rotation, paste_into, render_safe_area, CropRegion, InterpolationFilter,
};

/// Errors produced by the crop exporter.
#[derive(Debug, Error)]
pub enum CropError {
    /// The source bytes could not be decoded.
    #[error("Failed to decode source image: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// The cropped result could not be encoded.
    #[error("Failed to encode cropped image: {0}")]
    EncodeFailed(#[from] EncodeError),

    /// The region is empty or does not fit the source.
    #[error(
        "Invalid crop region {width}x{height} at ({x}, {y}) for {bounds_width}x{bounds_height} bounds"
    )]
    InvalidRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        bounds_width: u32,
        bounds_height: u32,
    },

    /// The source's pixel buffer does not match its dimensions.
    #[error("Pixel buffer of {actual} bytes does not match a {width}x{height} RGB image")]
    InvalidPixelData { width: u32, height: u32, actual: usize },

    /// A working buffer for this export would not fit in memory.
    #[error("Crop export buffer too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    /// The rotation angle is NaN or infinite.
    #[error("Invalid rotation angle: {0}")]
    InvalidRotation(f64),

    /// The background export task did not run to completion.
    #[error("Crop export interrupted: {0}")]
    Interrupted(String),
}

/// Tunables for an export.
///
/// Deserializes from camelCase JSON with every field optional, e.g.
/// `{ "quality": 90 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Resampling used when the rotation is not a whole number of turns.
    pub filter: InterpolationFilter,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: MAX_QUALITY,
            filter: InterpolationFilter::default(),
        }
    }
}

/// Check `crop` against `image` and `rotation`.
///
/// The pixel buffer must match the image size, and the region must be
/// non-empty and fit inside the source dimensions. The rotation does not
/// change the bounds.
pub fn validate_region(
    image: &DecodedImage,
    crop: &CropRegion,
    rotation: f64,
) -> Result<(), CropError> {
    if !rotation.is_finite() {
        return Err(CropError::InvalidRotation(rotation));
    }

    if !image.has_consistent_buffer() {
        return Err(CropError::InvalidPixelData {
            width: image.width,
            height: image.height,
            actual: image.pixels.len(),
        });
    }

    let (bounds_width, bounds_height) = if image.is_empty() {
        (0, 0)
    } else {
        (image.width, image.height)
    };

    if crop.is_empty() || !crop.fits_within(bounds_width, bounds_height) {
        return Err(CropError::InvalidRegion {
            x: crop.x,
            y: crop.y,
            width: crop.width,
            height: crop.height,
            bounds_width,
            bounds_height,
        });
    }

    Ok(())
}

/// Rotate and crop `image` without encoding.
///
/// Returns a raster of exactly `crop.width x crop.height`.
pub fn render_crop(
    image: &DecodedImage,
    crop: &CropRegion,
    rotation: f64,
    filter: InterpolationFilter,
) -> Result<DecodedImage, CropError> {
    if let Err(err) = validate_region(image, crop, rotation) {
        warn!(error = %err, "Rejected crop request");
        return Err(err);
    }

    let (area, captured) = render_safe_area(image, rotation, filter).map_err(buffer_error)?;
    let (offset_x, offset_y) = area.paste_offset(crop);
    debug!(
        side = area.side,
        offset_x,
        offset_y,
        width = crop.width,
        height = crop.height,
        "Pasting safe area into crop"
    );

    // The safe area buffer is dropped here, before encoding.
    paste_into(&captured, offset_x, offset_y, crop.width, crop.height).map_err(buffer_error)
}

fn buffer_error(err: DecodeError) -> CropError {
    match err {
        DecodeError::TooLarge { width, height } => CropError::TooLarge { width, height },
        other => CropError::DecodeFailed(other),
    }
}

/// Rotate, crop and JPEG-encode `image` with default options (quality 100).
///
/// # Example
///
/// ```ignore
/// use wisata_core::export::export_crop;
/// use wisata_core::transform::CropRegion;
///
/// let jpeg = export_crop(&image, &CropRegion::new(40, 10, 300, 300), 0.0)?;
/// ```
pub fn export_crop(
    image: &DecodedImage,
    crop: &CropRegion,
    rotation: f64,
) -> Result<Vec<u8>, CropError> {
    export_crop_with(image, crop, rotation, &ExportOptions::default())
}

/// Rotate, crop and JPEG-encode `image` with explicit options.
pub fn export_crop_with(
    image: &DecodedImage,
    crop: &CropRegion,
    rotation: f64,
    options: &ExportOptions,
) -> Result<Vec<u8>, CropError> {
    let cropped = render_crop(image, crop, rotation, options.filter)?;
    let jpeg = encode_image(&cropped, options.quality)?;

    debug!(
        bytes = jpeg.len(),
        quality = options.quality,
        rotated = !is_identity_rotation(rotation),
        "Exported crop"
    );
    Ok(jpeg)
}

/// Decode `encoded` and export a crop of it.
pub fn export_crop_bytes(
    encoded: &[u8],
    crop: &CropRegion,
    rotation: f64,
    options: &ExportOptions,
) -> Result<Vec<u8>, CropError> {
    let image = decode_image(encoded)?;
    export_crop_with(&image, crop, rotation, options)
}

/// Export a crop on tokio's blocking pool.
///
/// The future resolves once encoding has finished. Dropping the future does
/// not stop an export that has already started.
#[cfg(feature = "async")]
pub async fn export_crop_async(
    image: DecodedImage,
    crop: CropRegion,
    rotation: f64,
    options: ExportOptions,
) -> Result<Vec<u8>, CropError> {
    tokio::task::spawn_blocking(move || export_crop_with(&image, &crop, rotation, &options))
        .await
        .map_err(|e| CropError::Interrupted(e.to_string()))?
}
