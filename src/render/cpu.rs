use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::render::placement::PhotoPlacement;
use crate::render::surface::Surface;
use crate::scene::frame::FrameState;
use crate::scene::photo::PhotoState;

#[derive(Clone)]
struct ImagePaint {
    source: Arc<PreparedImage>,
    paint: vello_cpu::Image,
}

/// CPU compositor powered by `vello_cpu`.
///
/// Owns the fixed canvas. Every call to [`Compositor::render`] recomputes the full surface from
/// the given photo and frame state; nothing is patched incrementally.
pub struct Compositor {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: Option<vello_cpu::RenderContext>,
    photo_paint: Option<ImagePaint>,
    frame_paint: Option<ImagePaint>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Create a compositor for `canvas`.
    pub fn new(canvas: Canvas) -> TwibbonResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| TwibbonError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| TwibbonError::validation("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: None,
            photo_paint: None,
            frame_paint: None,
        })
    }

    /// The canvas this compositor renders at.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render the photo beneath the frame overlay.
    ///
    /// Missing layers are skipped: no photo renders frame-only, no frame renders photo-only.
    #[tracing::instrument(skip_all, fields(w = self.canvas.width, h = self.canvas.height))]
    pub fn render(&mut self, photo: &PhotoState, frame: &FrameState) -> TwibbonResult<Surface> {
        if photo.image().is_some() && !photo.transform.is_valid() {
            return Err(TwibbonError::validation(format!(
                "photo transform must be finite with scale > 0: {:?}",
                photo.transform
            )));
        }

        let photo_draw = match photo.image() {
            Some(img) => {
                let placement =
                    PhotoPlacement::compute(self.canvas, img.width, img.height, &photo.transform);
                let paint = cached_paint(&mut self.photo_paint, img)?;
                Some((placement.image_to_canvas(img.width, img.height), paint, img))
            }
            None => None,
        };
        let frame_draw = match frame.image() {
            Some(img) => {
                let paint = cached_paint(&mut self.frame_paint, img)?;
                let stretch = Affine::scale_non_uniform(
                    self.canvas.w() / f64::from(img.width),
                    self.canvas.h() / f64::from(img.height),
                );
                Some((stretch, paint, img))
            }
            None => None,
        };

        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some((tr, paint, img)) = photo_draw {
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(img.width),
                f64::from(img.height),
            ));
        }
        // The pivot transform must not leak into the frame layer.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some((tr, paint, img)) = frame_draw {
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(img.width),
                f64::from(img.height),
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        clear_pixmap_to_transparent(&mut pixmap);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        tracing::debug!(
            photo = photo.has_image(),
            frame = frame.is_loaded(),
            "composited surface"
        );
        Ok(Surface {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn cached_paint(
    slot: &mut Option<ImagePaint>,
    img: &Arc<PreparedImage>,
) -> TwibbonResult<vello_cpu::Image> {
    if let Some(p) = slot.as_ref()
        && Arc::ptr_eq(&p.source, img)
    {
        return Ok(p.paint.clone());
    }
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: high_quality_sampler(),
    };
    *slot = Some(ImagePaint {
        source: Arc::clone(img),
        paint: paint.clone(),
    });
    Ok(paint)
}

/// Bicubic sampling for both layers; the photo is usually resampled and the frame may be too.
fn high_quality_sampler() -> vello_cpu::peniko::ImageSampler {
    vello_cpu::peniko::ImageSampler {
        quality: vello_cpu::peniko::ImageQuality::High,
        ..vello_cpu::peniko::ImageSampler::default()
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TwibbonResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TwibbonError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TwibbonError::validation("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TwibbonError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
