//! Photo placement geometry.
//!
//! Everything here is expressed in canvas pixel units. The same numbers drive preview and export,
//! which is why both must use the same [`Canvas`].

use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
use crate::scene::photo::PhotoTransform;

/// Draw size and centering offsets for a photo on a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Drawn width before the pivot transform.
    pub draw_width: f64,
    /// Drawn height before the pivot transform.
    pub draw_height: f64,
    /// `(W - draw_width) / 2`.
    pub center_x: f64,
    /// `(H - draw_height) / 2`.
    pub center_y: f64,
}

/// Fit the photo's dominant axis to the canvas.
///
/// Landscape photos (`aspect > 1`) take the canvas width; everything else takes the canvas height.
/// The other axis may overflow or leave blank margins; this is not an aspect-fill crop.
pub fn cover_fit(canvas: Canvas, image_width: u32, image_height: u32) -> CoverFit {
    let (w, h) = (canvas.w(), canvas.h());
    let aspect = f64::from(image_width) / f64::from(image_height);
    let (draw_width, draw_height) = if aspect > 1.0 {
        (w, w / aspect)
    } else {
        (h * aspect, h)
    };
    CoverFit {
        draw_width,
        draw_height,
        center_x: (w - draw_width) / 2.0,
        center_y: (h - draw_height) / 2.0,
    }
}

/// Rotation and scale about the canvas center.
///
/// `translate(c) * rotate(theta) * scale(s) * translate(-c)`, clockwise-positive in y-down space.
pub fn pivot_transform(canvas: Canvas, t: &PhotoTransform) -> Affine {
    let c = canvas.center().to_vec2();
    Affine::translate(c)
        * Affine::rotate(t.rotation_deg.to_radians())
        * Affine::scale(t.scale)
        * Affine::translate(-c)
}

/// Resolved placement of one photo for one transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoPlacement {
    /// Pivot transform applied to the draw rectangle.
    pub pivot: Affine,
    /// Destination rectangle in pre-pivot canvas space.
    pub draw_rect: Rect,
    /// Fit used to derive `draw_rect`.
    pub fit: CoverFit,
}

impl PhotoPlacement {
    /// Compute placement for an `image_width`x`image_height` photo.
    pub fn compute(
        canvas: Canvas,
        image_width: u32,
        image_height: u32,
        t: &PhotoTransform,
    ) -> Self {
        let fit = cover_fit(canvas, image_width, image_height);
        let origin = Point::new(t.offset_x + fit.center_x, t.offset_y + fit.center_y);
        Self {
            pivot: pivot_transform(canvas, t),
            draw_rect: Rect::from_origin_size(origin, (fit.draw_width, fit.draw_height)),
            fit,
        }
    }

    /// Map image pixel space `[0, iw] x [0, ih]` to canvas space.
    pub fn image_to_canvas(&self, image_width: u32, image_height: u32) -> Affine {
        let sx = self.draw_rect.width() / f64::from(image_width);
        let sy = self.draw_rect.height() / f64::from(image_height);
        self.pivot
            * Affine::translate(Vec2::new(self.draw_rect.x0, self.draw_rect.y0))
            * Affine::scale_non_uniform(sx, sy)
    }

    /// Canvas position of a point given in pre-pivot draw space.
    pub fn map_point(&self, p: Point) -> Point {
        self.pivot * p
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
