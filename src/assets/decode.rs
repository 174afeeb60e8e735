use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::assets::svg_raster::rasterize_svg_for_canvas;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Largest decoded edge the rasterizer can sample from.
pub const MAX_IMAGE_DIM: u32 = u16::MAX as u32;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> TwibbonResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TwibbonError::decode_failed(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(TwibbonError::decode_failed(format!(
            "image {width}x{height} exceeds max {MAX_IMAGE_DIM}x{MAX_IMAGE_DIM}"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    tracing::debug!(width, height, "decoded image");
    PreparedImage::from_premul(width, height, rgba8_premul)
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> TwibbonResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| TwibbonError::decode_failed(format!("parse svg tree: {e}")))
}

/// Bytes of a document inspected by [`looks_like_svg`].
const SVG_SNIFF_LEN: usize = 4096;

/// Return `true` when the bytes look like an SVG document rather than a binary raster.
///
/// Known raster signatures win. Otherwise a leading BOM, XML declaration, processing
/// instructions, comments and a `DOCTYPE` are skipped before looking for the `<svg` root.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    if image::guess_format(bytes).is_ok() {
        return false;
    }
    let head = &bytes[..bytes.len().min(SVG_SNIFF_LEN)];
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        // The cut may split a multi-byte character; keep the valid prefix.
        Err(e) => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(t) => t,
            Err(_) => return false,
        },
    };

    let mut rest = text.trim_start_matches('\u{feff}').trim_start();
    loop {
        let skipped = if rest.starts_with("<?") {
            skip_past(rest, "?>")
        } else if rest.starts_with("<!--") {
            skip_past(rest, "-->")
        } else if rest
            .get(..9)
            .is_some_and(|p| p.eq_ignore_ascii_case("<!DOCTYPE"))
        {
            skip_doctype(rest)
        } else {
            break;
        };
        match skipped {
            Some(r) => rest = r.trim_start(),
            None => return false,
        }
    }
    rest.starts_with("<svg")
}

fn skip_past<'a>(s: &'a str, end: &str) -> Option<&'a str> {
    s.find(end).map(|i| &s[i + end.len()..])
}

/// Skip a `DOCTYPE`, including an internal `[...]` subset.
fn skip_doctype(s: &str) -> Option<&str> {
    let close = s.find('>')?;
    match s.find('[') {
        Some(open) if open < close => skip_past(&s[open..], "]").and_then(|r| skip_past(r, ">")),
        _ => Some(&s[close + 1..]),
    }
}

/// Decode a frame overlay.
///
/// Raster overlays keep their native size and are resampled at draw time. SVG overlays are
/// rasterized directly at canvas resolution.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_frame(bytes: &[u8], canvas: Canvas) -> TwibbonResult<PreparedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let rgba = rasterize_svg_for_canvas(&tree, canvas)?;
        return PreparedImage::from_premul(canvas.width, canvas.height, rgba);
    }
    decode_image(bytes)
}

/// Decode a photo on the blocking pool.
///
/// The returned future resolves once decoding finishes; dropping it does not cancel the work, the
/// result is simply discarded.
pub async fn decode_image_async(bytes: Arc<[u8]>) -> TwibbonResult<PreparedImage> {
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| TwibbonError::Other(anyhow::Error::new(e).context("image decode task")))?
}

/// Decode a frame overlay on the blocking pool.
pub async fn decode_frame_async(bytes: Arc<[u8]>, canvas: Canvas) -> TwibbonResult<PreparedImage> {
    tokio::task::spawn_blocking(move || decode_frame(&bytes, canvas))
        .await
        .map_err(|e| TwibbonError::Other(anyhow::Error::new(e).context("frame decode task")))?
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
