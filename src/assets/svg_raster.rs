use crate::foundation::core::{Canvas, MAX_CANVAS_DIM};
use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Rasterize an SVG overlay so it fills `width`x`height` exactly.
///
/// The SVG is stretched non-uniformly, matching how a raster frame is drawn at `(0, 0, W, H)`.
/// Output is premultiplied RGBA8.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> TwibbonResult<Vec<u8>> {
    if width == 0 || height == 0 || width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
        return Err(TwibbonError::validation(format!(
            "svg raster size {width}x{height} out of range"
        )));
    }
    let size = tree.size();
    if !(size.width().is_finite() && size.height().is_finite())
        || size.width() <= 0.0
        || size.height() <= 0.0
    {
        return Err(TwibbonError::decode_failed("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TwibbonError::decode_failed("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Rasterize an SVG overlay at canvas resolution.
pub(crate) fn rasterize_svg_for_canvas(
    tree: &usvg::Tree,
    canvas: Canvas,
) -> TwibbonResult<Vec<u8>> {
    rasterize_svg_to_premul_rgba8(tree, canvas.width, canvas.height)
}
