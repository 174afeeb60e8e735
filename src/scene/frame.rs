use std::sync::Arc;

use crate::assets::store::PreparedImage;

/// Descriptive metadata for a frame overlay.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameInfo {
    /// Stable identifier, also used in export file names.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Gallery category.
    pub category: String,
    /// Asset path relative to the assets root.
    pub source: String,
}

impl Default for FrameInfo {
    /// The bundled event frame.
    fn default() -> Self {
        Self {
            id: "milad-16".to_string(),
            display_name: "Milad Ke-16 UKM PTQ".to_string(),
            category: "Event".to_string(),
            source: "images/twibbon-frame.png".to_string(),
        }
    }
}

/// The decorative overlay drawn above the photo.
///
/// Constant for a session once loaded.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    /// Frame metadata.
    pub info: FrameInfo,
    pub(crate) image: Option<Arc<PreparedImage>>,
}

impl FrameState {
    /// Frame with metadata only; the image is attached once decoded.
    pub fn new(info: FrameInfo) -> Self {
        Self { info, image: None }
    }

    /// Frame with a decoded overlay.
    pub fn with_image(info: FrameInfo, image: Arc<PreparedImage>) -> Self {
        Self {
            info,
            image: Some(image),
        }
    }

    /// Decoded overlay, if loaded.
    pub fn image(&self) -> Option<&Arc<PreparedImage>> {
        self.image.as_ref()
    }

    /// Return `true` when the overlay is loaded.
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

/// Category name that matches every frame.
pub const ALL_CATEGORIES: &str = "all";

/// Selectable frame gallery.
///
/// The fixed-frame flow uses a single entry; the catalog exists so configuration can pick one.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameCatalog {
    frames: Vec<FrameInfo>,
}

impl FrameCatalog {
    /// Build a catalog, keeping insertion order.
    pub fn new(frames: Vec<FrameInfo>) -> Self {
        Self { frames }
    }

    /// Frames in `category`; `None` or [`ALL_CATEGORIES`] lists everything.
    pub fn list_frames(&self, category: Option<&str>) -> Vec<&FrameInfo> {
        match category {
            None => self.frames.iter().collect(),
            Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => self.frames.iter().collect(),
            Some(c) => self.frames.iter().filter(|f| f.category == c).collect(),
        }
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for f in &self.frames {
            if !out.contains(&f.category.as_str()) {
                out.push(&f.category);
            }
        }
        out
    }

    /// Look up a frame by id.
    pub fn get(&self, id: &str) -> Option<&FrameInfo> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/frame.rs"]
mod tests;
