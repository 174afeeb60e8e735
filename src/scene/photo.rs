use std::sync::Arc;

use crate::assets::store::PreparedImage;

/// User-controlled placement of the photo on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhotoTransform {
    /// Canvas-space horizontal translation, applied before the pivot transform.
    pub offset_x: f64,
    /// Canvas-space vertical translation, applied before the pivot transform.
    pub offset_y: f64,
    /// Uniform magnification about the canvas center.
    pub scale: f64,
    /// Clockwise rotation about the canvas center, in degrees.
    pub rotation_deg: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PhotoTransform {
    /// Centered, unscaled, unrotated.
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
    };

    /// Return `true` when every field is finite and `scale > 0`.
    pub fn is_valid(&self) -> bool {
        self.offset_x.is_finite()
            && self.offset_y.is_finite()
            && self.rotation_deg.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
    }
}

/// The uploaded photo and its placement.
///
/// Starts empty. Each successful upload replaces the image wholesale and resets the transform; the
/// previous image handle is dropped.
#[derive(Clone, Debug, Default)]
pub struct PhotoState {
    pub(crate) image: Option<Arc<PreparedImage>>,
    /// Current placement.
    pub transform: PhotoTransform,
}

impl PhotoState {
    /// Empty state: no image, identity transform.
    pub fn empty() -> Self {
        Self::default()
    }

    /// State holding `image` at the identity transform.
    pub fn with_image(image: Arc<PreparedImage>) -> Self {
        Self {
            image: Some(image),
            transform: PhotoTransform::IDENTITY,
        }
    }

    /// Replace the image and reset the transform.
    pub fn replace_image(&mut self, image: Arc<PreparedImage>) {
        self.image = Some(image);
        self.transform = PhotoTransform::IDENTITY;
    }

    /// Clear the image layer (e.g. after a failed decode), keeping the transform.
    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Decoded image, if any.
    pub fn image(&self) -> Option<&Arc<PreparedImage>> {
        self.image.as_ref()
    }

    /// Return `true` when an image is loaded.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
