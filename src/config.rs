use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets::upload::UploadPolicy;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::notice::DEFAULT_NOTICE_TTL;
use crate::scene::frame::{FrameCatalog, FrameInfo};

/// Editor configuration.
///
/// Every field has a default, so `{}` is a valid config. JSON example:
///
/// ```json
/// {
///   "canvas": { "width": 2160, "height": 2700 },
///   "assets_root": "public",
///   "frame_id": "milad-16",
///   "catalog": [{ "id": "milad-16", "display_name": "Milad Ke-16 UKM PTQ",
///                 "category": "Event", "source": "images/twibbon-frame.png" }],
///   "upload": { "max_bytes": 10485760 },
///   "notice_ttl_ms": 5000
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Shared preview/export canvas.
    pub canvas: Canvas,
    /// Directory bundled assets (the frame overlay) are resolved against.
    pub assets_root: PathBuf,
    /// Catalog entry used as the session frame. `None` picks the first entry.
    pub frame_id: Option<String>,
    /// Available frames.
    pub catalog: FrameCatalog,
    /// Upload validation limits.
    pub upload: UploadPolicy,
    /// Notice lifetime in milliseconds.
    pub notice_ttl_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            assets_root: PathBuf::from("."),
            frame_id: None,
            catalog: FrameCatalog::new(vec![FrameInfo::default()]),
            upload: UploadPolicy::default(),
            notice_ttl_ms: DEFAULT_NOTICE_TTL.as_millis() as u64,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TwibbonResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| TwibbonError::validation(format!("parse editor config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TwibbonResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TwibbonError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> TwibbonResult<()> {
        self.canvas.validate()?;
        if self.upload.max_bytes == 0 {
            return Err(TwibbonError::validation("upload.max_bytes must be > 0"));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(TwibbonError::validation(
                "upload.allowed_types must not be empty",
            ));
        }
        if self.notice_ttl_ms == 0 {
            return Err(TwibbonError::validation("notice_ttl_ms must be > 0"));
        }
        self.frame_info().map(|_| ())
    }

    /// Metadata of the session frame.
    pub fn frame_info(&self) -> TwibbonResult<&FrameInfo> {
        match &self.frame_id {
            Some(id) => self
                .catalog
                .get(id)
                .ok_or_else(|| TwibbonError::validation(format!("frame '{id}' not in catalog"))),
            None => self
                .catalog
                .list_frames(None)
                .into_iter()
                .next()
                .ok_or_else(|| TwibbonError::validation("frame catalog is empty")),
        }
    }

    /// Notice lifetime.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
