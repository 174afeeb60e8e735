use std::path::Path;

use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Default maximum upload size: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for photo uploads.
pub const DEFAULT_ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload validation limits.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Inclusive maximum payload size in bytes.
    pub max_bytes: usize,
    /// Accepted MIME types (lowercase, no parameters).
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A user-selected file before validation.
#[derive(Clone, Copy, Debug)]
pub struct UploadCandidate<'a> {
    /// Original file name, if known. Used to infer a MIME type when none is declared.
    pub file_name: Option<&'a str>,
    /// MIME type declared by the picker, if any.
    pub declared_type: Option<&'a str>,
    /// Raw file bytes.
    pub bytes: &'a [u8],
}

impl<'a> UploadCandidate<'a> {
    /// Candidate with bytes only; the type is sniffed from content.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            file_name: None,
            declared_type: None,
            bytes,
        }
    }
}

/// Strip MIME parameters and lowercase (`"Image/JPEG; q=1"` -> `"image/jpeg"`).
pub(crate) fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

fn mime_from_file_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?;
    image::ImageFormat::from_extension(ext).map(|f| f.to_mime_type())
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

impl UploadPolicy {
    /// Validate an upload and return its resolved MIME type.
    ///
    /// Rejections never touch editor state; they map to [`TwibbonError::InputRejected`].
    pub fn validate(&self, candidate: &UploadCandidate<'_>) -> TwibbonResult<String> {
        let size = candidate.bytes.len();
        if size == 0 {
            return Err(TwibbonError::input_rejected("file is empty"));
        }
        if size > self.max_bytes {
            return Err(TwibbonError::input_rejected(format!(
                "file is too large: {size} bytes (max {} MB)",
                self.max_bytes / 1024 / 1024
            )));
        }

        let sniffed = sniff_mime(candidate.bytes);
        let resolved = candidate
            .declared_type
            .map(normalize_mime_type)
            .filter(|t| !t.is_empty())
            .or_else(|| candidate.file_name.and_then(mime_from_file_name).map(str::to_string))
            .or_else(|| sniffed.map(str::to_string))
            .ok_or_else(|| TwibbonError::input_rejected("unrecognized file type"))?;

        if !self.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(&resolved)) {
            return Err(TwibbonError::input_rejected(format!(
                "unsupported file type '{resolved}' (allowed: {})",
                self.allowed_types.join(", ")
            )));
        }

        match sniffed {
            Some(actual) if actual == resolved => Ok(resolved),
            Some(actual) => Err(TwibbonError::input_rejected(format!(
                "file content is '{actual}' but was submitted as '{resolved}'"
            ))),
            None => Err(TwibbonError::input_rejected(format!(
                "file content is not a '{resolved}' image"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/upload.rs"]
mod tests;
