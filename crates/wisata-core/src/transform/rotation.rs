//! Rotation into a square "safe area" canvas.
//!
//! The crop exporter never rotates into a tight bounding box. It draws the
//! source, rotated about its own centre, into a square buffer whose side is
//! `2 * (max_side / 2) * sqrt(2)`, so no angle can clip a corner. The crop
//! step later cuts its region out of that buffer.
//!
//! Rotation uses inverse mapping: for each buffer pixel we find the source
//! position it came from and interpolate there.
//!
//! For rotation by angle θ (clockwise, y axis pointing down), with `(dx, dy)`
//! the buffer pixel centre relative to the drawn image centre:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + width / 2
//! src_y = -dx * sin(θ) + dy * cos(θ) + height / 2
//! ```

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::crop::CropRegion;
use crate::decode::{DecodeError, DecodedImage};

/// Angles closer than this to a multiple of 360 degrees are treated as no rotation.
const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationFilter {
    /// Bilinear interpolation, the same smoothing a 2D canvas applies.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation, sharper but slower.
    Lanczos3,
}

/// Normalize an angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    let angle = angle_degrees.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

/// Whether an angle is (close enough to) a whole number of turns.
#[inline]
pub fn is_identity_rotation(angle_degrees: f64) -> bool {
    let angle = normalize_angle(angle_degrees);
    angle < ANGLE_EPSILON || 360.0 - angle < ANGLE_EPSILON
}

/// Geometry of the square working buffer used for one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeArea {
    /// Exact side length, `2 * (max_side / 2) * sqrt(2)`. Its half is the
    /// rotation centre.
    pub extent: f64,
    /// Side of the pixel buffer (the extent truncated to whole pixels).
    pub side: u32,
    /// Top-left corner of the drawn source inside the buffer.
    pub origin_x: i64,
    pub origin_y: i64,
    width: u32,
    height: u32,
}

impl SafeArea {
    /// Lay out the safe area for a source of the given size.
    ///
    /// The source is centred on the buffer middle; its origin is snapped to
    /// whole pixels so that an unrotated export copies pixels exactly.
    pub fn for_image(width: u32, height: u32) -> Self {
        let max_size = width.max(height) as f64;
        let extent = 2.0 * ((max_size / 2.0) * SQRT_2);
        let center = extent / 2.0;

        Self {
            extent,
            side: extent as u32,
            origin_x: (center - width as f64 / 2.0).round() as i64,
            origin_y: (center - height as f64 / 2.0).round() as i64,
            width,
            height,
        }
    }

    /// Offset at which the captured buffer is pasted into the crop output.
    ///
    /// Equal to `round(-extent/2 + width/2 - crop.x)` (and likewise for y);
    /// computed from the snapped origin so the pixel at `(crop.x, crop.y)` of
    /// an unrotated source lands exactly on `(0, 0)`.
    pub fn paste_offset(&self, crop: &CropRegion) -> (i64, i64) {
        (
            -self.origin_x - crop.x as i64,
            -self.origin_y - crop.y as i64,
        )
    }

    /// Centre of the drawn source in buffer coordinates.
    fn image_center(&self) -> (f64, f64) {
        (
            self.origin_x as f64 + self.width as f64 / 2.0,
            self.origin_y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Draw `image` rotated by `angle_degrees` into its safe-area buffer.
///
/// The result is `side x side`. Pixels the rotated source does not cover are
/// black. Angles equal modulo 360 produce identical buffers. Fails with
/// [`DecodeError::TooLarge`] when the buffer cannot be addressed.
pub fn render_safe_area(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Result<(SafeArea, DecodedImage), DecodeError> {
    let area = SafeArea::for_image(image.width, image.height);
    let mut canvas = DecodedImage::blank(area.side, area.side)?;

    if image.is_empty() || area.side == 0 {
        return Ok((area, canvas));
    }

    let angle = normalize_angle(angle_degrees);
    debug!(
        width = image.width,
        height = image.height,
        side = area.side,
        angle,
        "Rendering safe area"
    );

    if is_identity_rotation(angle) {
        draw_unrotated(image, &area, &mut canvas);
        return Ok((area, canvas));
    }

    let angle_rad = angle.to_radians();
    let (sin, cos) = angle_rad.sin_cos();
    let (center_x, center_y) = area.image_center();
    let (half_w, half_h) = (image.width as f64 / 2.0, image.height as f64 / 2.0);
    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let side = area.side as usize;

    for dst_y in 0..side {
        let dy = dst_y as f64 + 0.5 - center_y;
        let row = &mut canvas.pixels[dst_y * side * 3..(dst_y + 1) * side * 3];

        for dst_x in 0..side {
            let dx = dst_x as f64 + 0.5 - center_x;

            let src_x = dx * cos + dy * sin + half_w;
            let src_y = -dx * sin + dy * cos + half_h;

            if src_x < 0.0 || src_y < 0.0 || src_x >= src_w || src_y >= src_h {
                continue;
            }

            // Sample at pixel centres
            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x - 0.5, src_y - 0.5),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x - 0.5, src_y - 0.5),
            };
            row[dst_x * 3..dst_x * 3 + 3].copy_from_slice(&pixel);
        }
    }

    Ok((area, canvas))
}

/// Copy the source into the buffer at the safe-area origin, row by row.
fn draw_unrotated(image: &DecodedImage, area: &SafeArea, canvas: &mut DecodedImage) {
    let side = area.side as i64;
    let row_bytes = image.width as usize * 3;

    for y in 0..image.height as i64 {
        let dst_y = area.origin_y + y;
        if dst_y < 0 || dst_y >= side {
            continue;
        }
        // Horizontal overlap of the source row with the buffer
        let first = (-area.origin_x).max(0);
        let last = (side - area.origin_x).min(image.width as i64);
        if first >= last {
            continue;
        }

        let src_start = y as usize * row_bytes + first as usize * 3;
        let src_end = y as usize * row_bytes + last as usize * 3;
        let dst_start = (dst_y * side + area.origin_x + first) as usize * 3;
        canvas.pixels[dst_start..dst_start + (src_end - src_start)]
            .copy_from_slice(&image.pixels[src_start..src_end]);
    }
}

/// Get a pixel as [f64; 3], clamping coordinates to the image edge.
#[inline]
fn get_pixel_clamped(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let x = px.clamp(0, image.width as i64 - 1) as u32;
    let y = py.clamp(0, image.height as i64 - 1) as u32;
    let [r, g, b] = image.pixel(x, y);
    [r as f64, g as f64, b as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates are in pixel-index space (pixel `i` has its centre at `i`).
/// Neighbours past the edge repeat the edge pixel.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_clamped(image, x0, y0);
    let p10 = get_pixel_clamped(image, x0 + 1, y0);
    let p01 = get_pixel_clamped(image, x0, y0 + 1);
    let p11 = get_pixel_clamped(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighbourhood.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_clamped(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum.abs() > f64::EPSILON {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, zero elsewhere.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
