use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::render::surface::Surface;

/// Encoded export ready to be handed to a sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download file name.
    pub file_name: String,
    /// PNG bytes.
    pub bytes: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Encode a surface as a straight-alpha RGBA8 PNG.
#[tracing::instrument(skip(surface), fields(w = surface.width, h = surface.height))]
pub fn encode_png(surface: &Surface) -> TwibbonResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(surface.width, surface.height, surface.to_straight_rgba())
        .ok_or_else(|| TwibbonError::export_failed("surface byte len does not match dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| TwibbonError::export_failed(format!("encode png: {e}")))?;
    Ok(buf)
}

/// `twibbon-<frame_id>-<unix_millis>.png`.
///
/// Characters outside `[A-Za-z0-9_-]` in the frame id are replaced with `-`.
pub fn export_file_name(frame_id: &str, unix_millis: u128) -> String {
    let id: String = frame_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let id = if id.is_empty() { "frame".to_string() } else { id };
    format!("twibbon-{id}-{unix_millis}.png")
}

/// Milliseconds since the Unix epoch, saturating to 0 for clocks set before 1970.
pub fn unix_millis_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
