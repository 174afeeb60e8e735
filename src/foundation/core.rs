use crate::foundation::error::{TwibbonError, TwibbonResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest canvas edge the CPU rasterizer accepts.
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Fixed logical render surface in pixels.
///
/// Preview and export share one `Canvas`. All placement math is expressed in these pixel units, so
/// rendering the preview at a different size than the export would shift and crop the photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    /// 2160x2700, a 4:5 portrait surface.
    fn default() -> Self {
        Self {
            width: 2160,
            height: 2700,
        }
    }
}

impl Canvas {
    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> TwibbonResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Check the dimensions are non-zero and within the rasterizer limit.
    pub fn validate(self) -> TwibbonResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TwibbonError::validation("canvas dimensions must be > 0"));
        }
        if self.width > MAX_CANVAS_DIM || self.height > MAX_CANVAS_DIM {
            return Err(TwibbonError::validation(format!(
                "canvas {}x{} exceeds max {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Canvas center, the pivot for photo rotation and scale.
    pub fn center(self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        Self {
            r: crate::foundation::math::mul_div255_u8(u16::from(r), a16),
            g: crate::foundation::math::mul_div255_u8(u16::from(g), a16),
            b: crate::foundation::math::mul_div255_u8(u16::from(b), a16),
            a,
        }
    }

    /// Build from a 4-byte premultiplied pixel slice.
    pub fn from_bytes(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
