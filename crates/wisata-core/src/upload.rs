//! State of the "Upload Photo" dialog.
//!
//! Profile pictures, article covers and lodging photos all go through the
//! same dialog: pick a file, frame it in the cropper, save, upload. The UI
//! keeps one [`PhotoEditor`] per open dialog and drives it with the methods
//! below; the JPEG handed to the uploader comes from [`crate::export`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::DecodedImage;
use crate::encode::encode_image;
use crate::export::{render_crop, CropError, ExportOptions};
use crate::transform::CropRegion;

/// Smallest cropper zoom (100 %).
pub const MIN_ZOOM: f64 = 1.0;
/// Largest cropper zoom (180 %).
pub const MAX_ZOOM: f64 = 1.8;

/// Errors from the upload dialog state machine.
#[derive(Debug, Error)]
pub enum UploadError {
    /// An aspect ratio string was not one of the supported `a/b` forms.
    #[error("Unsupported aspect ratio: {0:?}")]
    UnsupportedAspectRatio(String),

    /// The action needs a selected photo.
    #[error("No photo selected")]
    NoPhoto,

    /// Save was requested outside the editing step.
    #[error("Photo is not being edited")]
    NotEditing,

    /// Exporting the crop failed.
    #[error(transparent)]
    Crop(#[from] CropError),
}

/// Cropper frame proportions offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "4/3")]
    FourThree,
    #[serde(rename = "16/9")]
    SixteenNine,
    #[default]
    #[serde(rename = "1/1")]
    Square,
    #[serde(rename = "3/4")]
    ThreeFour,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        let (w, h) = self.parts();
        w as f64 / h as f64
    }

    fn parts(self) -> (u32, u32) {
        match self {
            AspectRatio::FourThree => (4, 3),
            AspectRatio::SixteenNine => (16, 9),
            AspectRatio::Square => (1, 1),
            AspectRatio::ThreeFour => (3, 4),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.parts();
        write!(f, "{}/{}", w, h)
    }
}

impl FromStr for AspectRatio {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4/3" => Ok(AspectRatio::FourThree),
            "16/9" => Ok(AspectRatio::SixteenNine),
            "1/1" => Ok(AspectRatio::Square),
            "3/4" => Ok(AspectRatio::ThreeFour),
            other => Err(UploadError::UnsupportedAspectRatio(other.to_string())),
        }
    }
}

/// Shape of the cropper mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropShape {
    Rect,
    #[default]
    Round,
}

/// Which step of the dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Preview with "choose photo" / "edit" / "upload" buttons.
    #[default]
    Preview,
    /// Cropper is open. `first_time` is set when the photo was just chosen,
    /// so cancelling drops it again.
    Editing { first_time: bool },
}

/// The dialog's state record.
#[derive(Debug, Clone)]
pub struct PhotoEditor {
    aspect_ratio: AspectRatio,
    shape: CropShape,
    options: ExportOptions,
    mode: EditorMode,
    photo: Option<DecodedImage>,
    crop_area: Option<CropRegion>,
    rotation: f64,
    zoom: f64,
    exported: Option<Vec<u8>>,
}

impl Default for PhotoEditor {
    fn default() -> Self {
        Self::new(AspectRatio::default(), CropShape::default())
    }
}

impl PhotoEditor {
    pub fn new(aspect_ratio: AspectRatio, shape: CropShape) -> Self {
        Self {
            aspect_ratio,
            shape,
            options: ExportOptions::default(),
            mode: EditorMode::Preview,
            photo: None,
            crop_area: None,
            rotation: 0.0,
            zoom: MIN_ZOOM,
            exported: None,
        }
    }

    /// Open the dialog on an already stored photo.
    pub fn with_initial_photo(mut self, photo: DecodedImage) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Override export settings.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn shape(&self) -> CropShape {
        self.shape
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Editing { .. })
    }

    /// The photo currently shown (the cropped result after a save).
    pub fn photo(&self) -> Option<&DecodedImage> {
        self.photo.as_ref()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// A new file was chosen: open the cropper on it with fresh framing.
    pub fn select_photo(&mut self, photo: DecodedImage) {
        debug!(width = photo.width, height = photo.height, "Photo selected");
        self.photo = Some(photo);
        self.crop_area = None;
        self.rotation = 0.0;
        self.zoom = MIN_ZOOM;
        self.mode = EditorMode::Editing { first_time: true };
    }

    /// Reopen the cropper on the current photo.
    pub fn edit(&mut self) -> Result<(), UploadError> {
        if self.photo.is_none() {
            return Err(UploadError::NoPhoto);
        }
        self.mode = EditorMode::Editing { first_time: false };
        Ok(())
    }

    /// Record the region reported by the cropper when a drag/zoom completes.
    pub fn set_crop_area(&mut self, crop_area: CropRegion) {
        self.crop_area = Some(crop_area);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_nan() {
            MIN_ZOOM
        } else {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        };
    }

    /// Export the framed region.
    ///
    /// On success the cropped image replaces the current photo, the JPEG is
    /// kept for [`upload_payload`](Self::upload_payload) and the dialog
    /// returns to the preview. On failure the state is left unchanged.
    pub fn save(&mut self) -> Result<&[u8], UploadError> {
        if !self.is_editing() {
            return Err(UploadError::NotEditing);
        }
        let photo = self.photo.as_ref().ok_or(UploadError::NoPhoto)?;
        // Without a reported area the cropper never moved: frame nothing
        let crop_area = self.crop_area.unwrap_or_default();

        let cropped = render_crop(photo, &crop_area, self.rotation, self.options.filter)?;
        let jpeg = encode_image(&cropped, self.options.quality).map_err(CropError::from)?;
        debug!(bytes = jpeg.len(), "Photo edit saved");

        self.photo = Some(cropped);
        self.crop_area = None;
        self.rotation = 0.0;
        self.zoom = MIN_ZOOM;
        self.mode = EditorMode::Preview;
        Ok(self.exported.insert(jpeg).as_slice())
    }

    /// Close the cropper without saving.
    ///
    /// A photo that was only just chosen is discarded.
    pub fn cancel(&mut self) {
        if let EditorMode::Editing { first_time: true } = self.mode {
            self.photo = None;
            self.exported = None;
        }
        self.mode = EditorMode::Preview;
    }

    /// The JPEG to upload, available after a successful save.
    pub fn upload_payload(&self) -> Option<&[u8]> {
        self.exported.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..(width * height * 3) as usize)
            .map(|i| (i % 200) as u8)
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("4/3".parse::<AspectRatio>().unwrap(), AspectRatio::FourThree);
        assert_eq!("16/9".parse::<AspectRatio>().unwrap(), AspectRatio::SixteenNine);
        assert_eq!(" 1/1 ".parse::<AspectRatio>().unwrap(), AspectRatio::Square);
        assert_eq!("3/4".parse::<AspectRatio>().unwrap(), AspectRatio::ThreeFour);
        assert!(matches!(
            "2/1".parse::<AspectRatio>(),
            Err(UploadError::UnsupportedAspectRatio(_))
        ));
    }

    #[test]
    fn test_aspect_ratio_value_and_display() {
        assert!((AspectRatio::SixteenNine.ratio() - 16.0 / 9.0).abs() < 1e-12);
        assert_eq!(AspectRatio::ThreeFour.ratio(), 0.75);
        assert_eq!(AspectRatio::default().to_string(), "1/1");
        assert_eq!(AspectRatio::FourThree.to_string(), "4/3");
    }

    #[test]
    fn test_defaults_match_dialog() {
        let editor = PhotoEditor::default();
        assert_eq!(editor.aspect_ratio(), AspectRatio::Square);
        assert_eq!(editor.shape(), CropShape::Round);
        assert_eq!(editor.mode(), EditorMode::Preview);
        assert_eq!(editor.zoom(), MIN_ZOOM);
        assert!(editor.photo().is_none());
        assert!(editor.upload_payload().is_none());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        editor.set_zoom(1.5);
        assert_eq!(editor.zoom(), 1.5);
        editor.set_zoom(3.0);
        assert_eq!(editor.zoom(), MAX_ZOOM);
        editor.set_zoom(0.2);
        assert_eq!(editor.zoom(), MIN_ZOOM);
        editor.set_zoom(f64::NAN);
        assert_eq!(editor.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_select_save_upload() {
        let mut editor = PhotoEditor::new(AspectRatio::FourThree, CropShape::Rect);
        editor.select_photo(photo(40, 30));
        assert_eq!(editor.mode(), EditorMode::Editing { first_time: true });

        editor.set_crop_area(CropRegion::new(4, 3, 20, 15));
        let saved = editor.save().unwrap().to_vec();

        assert_eq!(editor.mode(), EditorMode::Preview);
        assert_eq!(editor.upload_payload(), Some(saved.as_slice()));
        let current = editor.photo().unwrap();
        assert_eq!((current.width, current.height), (20, 15));

        let decoded = image::load_from_memory(&saved).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 15));
    }

    #[test]
    fn test_cancel_first_time_discards_photo() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        editor.select_photo(photo(10, 10));
        editor.cancel();

        assert_eq!(editor.mode(), EditorMode::Preview);
        assert!(editor.photo().is_none());
    }

    #[test]
    fn test_cancel_reedit_keeps_photo_and_payload() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        editor.select_photo(photo(10, 10));
        editor.set_crop_area(CropRegion::new(0, 0, 8, 8));
        editor.save().unwrap();

        editor.edit().unwrap();
        assert_eq!(editor.mode(), EditorMode::Editing { first_time: false });
        editor.cancel();

        assert_eq!(editor.photo().map(|p| p.width), Some(8));
        assert!(editor.upload_payload().is_some());
    }

    #[test]
    fn test_edit_requires_photo() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        assert!(matches!(editor.edit(), Err(UploadError::NoPhoto)));

        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round)
            .with_initial_photo(photo(6, 6));
        assert!(editor.edit().is_ok());
    }

    #[test]
    fn test_save_outside_editing_rejected() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round)
            .with_initial_photo(photo(6, 6));
        assert!(matches!(editor.save(), Err(UploadError::NotEditing)));
    }

    #[test]
    fn test_save_without_crop_area_fails_and_keeps_state() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        editor.select_photo(photo(12, 12));

        let result = editor.save();
        assert!(matches!(
            result,
            Err(UploadError::Crop(CropError::InvalidRegion { .. }))
        ));
        assert!(editor.is_editing());
        assert_eq!(editor.photo().map(|p| p.width), Some(12));
        assert!(editor.upload_payload().is_none());
    }

    #[test]
    fn test_save_with_rotation_and_options() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round).with_options(
            ExportOptions {
                quality: 60,
                ..Default::default()
            },
        );
        editor.select_photo(photo(20, 20));
        editor.set_rotation(45.0);
        editor.set_crop_area(CropRegion::new(2, 2, 16, 16));

        let jpeg = editor.save().unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(editor.rotation(), 0.0);
    }

    #[test]
    fn test_new_selection_resets_framing() {
        let mut editor = PhotoEditor::new(AspectRatio::Square, CropShape::Round);
        editor.select_photo(photo(10, 10));
        editor.set_zoom(1.6);
        editor.set_rotation(90.0);
        editor.select_photo(photo(12, 12));

        assert_eq!(editor.zoom(), MIN_ZOOM);
        assert_eq!(editor.rotation(), 0.0);
    }
}
