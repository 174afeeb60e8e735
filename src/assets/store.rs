use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::foundation::math::fingerprint;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied bytes, checking the buffer length against the dimensions.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TwibbonResult<Self> {
        if width == 0 || height == 0 {
            return Err(TwibbonError::decode_failed("image has zero width or height"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(TwibbonError::decode_failed(format!(
                "image byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Normalize and validate asset paths relative to the assets root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> TwibbonResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TwibbonError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(TwibbonError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TwibbonError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TwibbonError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Read a bundled asset relative to `root`.
pub(crate) fn read_asset(root: &Path, rel: &str) -> TwibbonResult<Vec<u8>> {
    let norm = normalize_rel_path(rel)?;
    let p = root.join(Path::new(&norm));
    std::fs::read(&p).map_err(|e| {
        TwibbonError::decode_failed(format!("failed to read asset '{}': {e}", p.display()))
    })
}

/// Cache key: content fingerprint plus the raster size the bytes were prepared for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ImageKey {
    content: u64,
    raster: Option<(u32, u32)>,
}

impl ImageKey {
    pub(crate) fn new(bytes: &[u8], raster: Option<(u32, u32)>) -> Self {
        Self {
            content: fingerprint(bytes),
            raster,
        }
    }
}

/// Decoded-image cache keyed by source content.
///
/// Used to skip redundant decodes of an unchanged frame overlay. Correctness never depends on a
/// hit; a miss simply decodes again.
#[derive(Debug, Default)]
pub(crate) struct ImageCache {
    entries: HashMap<ImageKey, Arc<PreparedImage>>,
    hits: u64,
    misses: u64,
}

impl ImageCache {
    pub(crate) fn get(&mut self, key: &ImageKey) -> Option<Arc<PreparedImage>> {
        match self.entries.get(key) {
            Some(img) => {
                self.hits += 1;
                Some(Arc::clone(img))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&mut self, key: ImageKey, image: Arc<PreparedImage>) {
        self.entries.insert(key, image);
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
