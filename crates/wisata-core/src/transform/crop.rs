//! Crop regions and the destructive paste step.
//!
//! Crop regions are whole-pixel rectangles in the coordinate space of the
//! source image's native resolution, as reported by the crop widget.
//!
//! The exporter does not "cut" pixels out of the rotated buffer. It allocates
//! an output of exactly the crop size and pastes the whole buffer into it at a
//! (usually negative) offset; whatever falls outside the output is dropped and
//! whatever is not covered stays black.

use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, DecodedImage};

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// True when the region has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the region lies inside a `bounds_width x bounds_height` frame.
    pub fn fits_within(&self, bounds_width: u32, bounds_height: u32) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        right <= bounds_width as u64 && bottom <= bounds_height as u64
    }
}

/// Paste `source` into a new black `width x height` image at `(offset_x, offset_y)`.
///
/// Output pixel `(i, j)` is `source(i - offset_x, j - offset_y)` when that lies
/// inside the source, black otherwise. The output is always exactly
/// `width x height`; sizes whose buffer would overflow fail with
/// [`DecodeError::TooLarge`].
pub fn paste_into(
    source: &DecodedImage,
    offset_x: i64,
    offset_y: i64,
    width: u32,
    height: u32,
) -> Result<DecodedImage, DecodeError> {
    let mut output = DecodedImage::blank(width, height)?;

    let src_w = source.width as i64;
    let src_h = source.height as i64;
    let out_w = width as i64;

    // Output columns that receive source pixels
    let first_col = offset_x.max(0);
    let last_col = (src_w + offset_x).min(out_w);
    if first_col >= last_col {
        return Ok(output);
    }
    let span = (last_col - first_col) as usize * 3;

    for out_y in 0..height as i64 {
        let src_y = out_y - offset_y;
        if src_y < 0 || src_y >= src_h {
            continue;
        }

        let src_x = first_col - offset_x;
        let src_start = ((src_y * src_w + src_x) * 3) as usize;
        let dst_start = ((out_y * out_w + first_col) * 3) as usize;

        output.pixels[dst_start..dst_start + span]
            .copy_from_slice(&source.pixels[src_start..src_start + span]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v);
                pixels.push(v);
                pixels.push(v);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_region_fits_within() {
        let region = CropRegion::new(10, 20, 30, 40);
        assert!(region.fits_within(40, 60));
        assert!(!region.fits_within(39, 60));
        assert!(!region.fits_within(40, 59));
    }

    #[test]
    fn test_region_fits_no_overflow() {
        let region = CropRegion::new(u32::MAX, 0, u32::MAX, 1);
        assert!(!region.fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_region_empty() {
        assert!(CropRegion::new(0, 0, 0, 5).is_empty());
        assert!(CropRegion::new(0, 0, 5, 0).is_empty());
        assert!(!CropRegion::full(1, 1).is_empty());
    }

    #[test]
    fn test_paste_negative_offset_extracts_subrect() {
        let img = test_image(10, 10);
        let out = paste_into(&img, -2, -3, 4, 2).unwrap();

        assert_eq!((out.width, out.height), (4, 2));
        // First pixel comes from (2, 3) in the source
        assert_eq!(out.pixel(0, 0)[0], 32);
        assert_eq!(out.pixel(3, 1)[0], 45);
    }

    #[test]
    fn test_paste_positive_offset_leaves_black_border() {
        let img = test_image(2, 2);
        let out = paste_into(&img, 1, 1, 4, 4).unwrap();

        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
        assert_eq!(out.pixel(1, 1), img.pixel(0, 0));
        assert_eq!(out.pixel(2, 2), img.pixel(1, 1));
        assert_eq!(out.pixel(3, 3), [0, 0, 0]);
    }

    #[test]
    fn test_paste_fully_outside_is_black() {
        let img = test_image(5, 5);
        let out = paste_into(&img, -50, 0, 3, 3).unwrap();
        assert!(out.pixels.iter().all(|&p| p == 0));

        let out = paste_into(&img, 0, 40, 3, 3).unwrap();
        assert!(out.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_paste_oversized_output_is_error() {
        let img = test_image(2, 2);
        let result = paste_into(&img, 0, 0, u32::MAX, u32::MAX);
        assert!(matches!(result, Err(DecodeError::TooLarge { .. })));
    }

    #[test]
    fn test_paste_larger_than_source() {
        let img = test_image(3, 3);
        let out = paste_into(&img, 0, 0, 10, 10).unwrap();
        assert_eq!(out.pixels.len(), 300);
        assert_eq!(out.pixel(2, 2), img.pixel(2, 2));
        assert_eq!(out.pixel(3, 0), [0, 0, 0]);
    }
}
