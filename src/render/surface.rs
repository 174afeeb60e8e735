use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::foundation::math::{fingerprint, unpremultiply_rgba8_in_place};

/// A rendered composite as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Surface {
    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> TwibbonResult<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return Err(TwibbonError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} surface",
                self.width, self.height
            )));
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Ok(Rgba8Premul::from_bytes([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    /// Straight-alpha copy of the pixel data, as stored in exported files.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Content fingerprint of the pixel data.
    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.data)
    }
}
