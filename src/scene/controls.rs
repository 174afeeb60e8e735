use crate::foundation::core::{Canvas, Point, Vec2};
use crate::scene::photo::PhotoTransform;

/// Inclusive slider range with a step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SliderRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Step size; values are snapped to `min + k * step`.
    pub step: f64,
}

impl SliderRange {
    /// Clamp `v` into `[min, max]`.
    pub fn clamp(self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    /// Snap `v` to the step grid, then clamp.
    pub fn snap(self, v: f64) -> f64 {
        if self.step <= 0.0 {
            return self.clamp(v);
        }
        let k = ((v - self.min) / self.step).round();
        // Round away representation noise such as 1.2000000000000002.
        let snapped = ((self.min + k * self.step) * 1e9).round() / 1e9;
        self.clamp(snapped)
    }
}

/// Recommended control bounds for a canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformBounds {
    /// Zoom slider.
    pub scale: SliderRange,
    /// Rotation slider, degrees.
    pub rotation: SliderRange,
    /// Horizontal position slider, `[-W/2, W/2]`.
    pub offset_x: SliderRange,
    /// Vertical position slider, `[-H/2, H/2]`.
    pub offset_y: SliderRange,
}

impl TransformBounds {
    /// Bounds for `canvas`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self {
            scale: SliderRange {
                min: 0.5,
                max: 3.0,
                step: 0.1,
            },
            rotation: SliderRange {
                min: -180.0,
                max: 180.0,
                step: 1.0,
            },
            offset_x: SliderRange {
                min: -canvas.w() / 2.0,
                max: canvas.w() / 2.0,
                step: 1.0,
            },
            offset_y: SliderRange {
                min: -canvas.h() / 2.0,
                max: canvas.h() / 2.0,
                step: 1.0,
            },
        }
    }

    /// Clamp every field of `t` into range without snapping.
    ///
    /// Non-finite fields fall back to the identity value.
    pub fn clamp(&self, t: PhotoTransform) -> PhotoTransform {
        let or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        PhotoTransform {
            offset_x: self.offset_x.clamp(or(t.offset_x, 0.0)),
            offset_y: self.offset_y.clamp(or(t.offset_y, 0.0)),
            scale: self.scale.clamp(or(t.scale, 1.0)),
            rotation_deg: self.rotation.clamp(or(t.rotation_deg, 0.0)),
        }
    }
}

/// Convert a screen-space pointer delta into canvas-space.
///
/// The canvas renders at fixed logical resolution but is displayed responsively, so each screen
/// pixel covers `W / displayed_w` canvas pixels horizontally and `H / displayed_h` vertically.
pub fn screen_to_canvas_delta(canvas: Canvas, displayed: DisplaySize, delta: Vec2) -> Vec2 {
    if !(displayed.width > 0.0 && displayed.height > 0.0) {
        return Vec2::ZERO;
    }
    Vec2::new(
        delta.x * (canvas.w() / displayed.width),
        delta.y * (canvas.h() / displayed.height),
    )
}

/// On-screen size of the displayed canvas element, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplaySize {
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

impl DisplaySize {
    /// Construct a display size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer/touch drag state.
///
/// Positions are relative to the displayed canvas element's top-left corner.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragTracker {
    last: Option<Point>,
}

impl DragTracker {
    /// Start dragging at `pos`.
    pub fn begin(&mut self, pos: Point) {
        self.last = Some(pos);
    }

    /// Move to `pos` and return the screen-space delta since the last position.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let last = self.last?;
        self.last = Some(pos);
        Some(pos - last)
    }

    /// Stop dragging (pointer up, pointer leave, touch end).
    pub fn end(&mut self) {
        self.last = None;
    }

    /// Return `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}

/// Applies slider and drag input to a [`PhotoTransform`].
///
/// Every setter ignores non-finite input and keeps the transform inside [`TransformBounds`], so
/// the compositor never sees malformed values.
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    canvas: Canvas,
    bounds: TransformBounds,
}

impl Controls {
    /// Controls for `canvas` with the recommended bounds.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            bounds: TransformBounds::for_canvas(canvas),
        }
    }

    /// Active bounds.
    pub fn bounds(&self) -> &TransformBounds {
        &self.bounds
    }

    /// Zoom slider input.
    pub fn set_scale(&self, t: &mut PhotoTransform, v: f64) -> bool {
        set_snapped(&mut t.scale, self.bounds.scale, v)
    }

    /// Rotation slider input.
    pub fn set_rotation(&self, t: &mut PhotoTransform, v: f64) -> bool {
        set_snapped(&mut t.rotation_deg, self.bounds.rotation, v)
    }

    /// Horizontal position slider input.
    pub fn set_offset_x(&self, t: &mut PhotoTransform, v: f64) -> bool {
        set_snapped(&mut t.offset_x, self.bounds.offset_x, v)
    }

    /// Vertical position slider input.
    pub fn set_offset_y(&self, t: &mut PhotoTransform, v: f64) -> bool {
        set_snapped(&mut t.offset_y, self.bounds.offset_y, v)
    }

    /// Apply a screen-space drag delta, rescaled to canvas space.
    ///
    /// Drag input is continuous and not snapped to the slider step.
    pub fn apply_drag(&self, t: &mut PhotoTransform, displayed: DisplaySize, delta: Vec2) -> bool {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return false;
        }
        let d = screen_to_canvas_delta(self.canvas, displayed, delta);
        let next_x = self.bounds.offset_x.clamp(t.offset_x + d.x);
        let next_y = self.bounds.offset_y.clamp(t.offset_y + d.y);
        let changed = next_x != t.offset_x || next_y != t.offset_y;
        t.offset_x = next_x;
        t.offset_y = next_y;
        changed
    }
}

fn set_snapped(field: &mut f64, range: SliderRange, v: f64) -> bool {
    if !v.is_finite() {
        return false;
    }
    let next = range.snap(v);
    let changed = next != *field;
    *field = next;
    changed
}

#[cfg(test)]
#[path = "../../tests/unit/scene/controls.rs"]
mod tests;
