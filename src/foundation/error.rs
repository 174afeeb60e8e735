/// Convenience result type used across twibbon.
pub type TwibbonResult<T> = Result<T, TwibbonError>;

/// Top-level error taxonomy used by the compositor, upload, and export APIs.
///
/// Every variant is recoverable: callers may retry the failed upload or export without
/// rebuilding the editor session.
#[derive(thiserror::Error, Debug)]
pub enum TwibbonError {
    /// Upload failed MIME-type or size validation. State is left unchanged.
    #[error("input rejected: {0}")]
    InputRejected(String),

    /// Bytes could not be decoded as a raster (or SVG) image.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Serializing or saving the final surface failed.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// Invalid configuration or precondition violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TwibbonError {
    /// Build a [`TwibbonError::InputRejected`] value.
    pub fn input_rejected(msg: impl Into<String>) -> Self {
        Self::InputRejected(msg.into())
    }

    /// Build a [`TwibbonError::DecodeFailed`] value.
    pub fn decode_failed(msg: impl Into<String>) -> Self {
        Self::DecodeFailed(msg.into())
    }

    /// Build a [`TwibbonError::ExportFailed`] value.
    pub fn export_failed(msg: impl Into<String>) -> Self {
        Self::ExportFailed(msg.into())
    }

    /// Build a [`TwibbonError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short user-facing title for the notice raised by this error.
    pub fn notice_title(&self) -> &'static str {
        match self {
            Self::InputRejected(_) => "Photo upload failed",
            Self::DecodeFailed(_) => "Image could not be read",
            Self::ExportFailed(_) => "Download failed",
            Self::Validation(_) => "Invalid settings",
            Self::Other(_) => "Something went wrong",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
