use crate::task::clamp_rating;

use super::error::LayoutError;
use super::types::Canvas;

/// Relative position of a rating pair: high urgency to the left, high
/// importance to the top.
pub fn percent(urgency: u8, importance: u8) -> (f32, f32) {
    (
        (100.0 - urgency as f32) / 100.0,
        (100.0 - importance as f32) / 100.0,
    )
}

/// Maps ratings to canvas pixels and back for one canvas and font.
///
/// The vertical span leaves room for the text's full height so that a
/// baseline at either extreme keeps the text on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    canvas: Canvas,
    margin: f32,
    padding: f32,
    ascent: f32,
    descent: f32,
}

impl Projection {
    pub fn new(
        canvas: Canvas,
        margin: f32,
        padding: f32,
        ascent: f32,
        descent: f32,
    ) -> Result<Self, LayoutError> {
        let projection = Self {
            canvas,
            margin,
            padding,
            ascent,
            descent,
        };
        if !(projection.span_x() > 0.0 && projection.span_y() > 0.0) {
            return Err(LayoutError::CanvasTooSmall {
                width: canvas.width,
                height: canvas.height,
                margin,
            });
        }
        Ok(projection)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn span_x(&self) -> f32 {
        self.canvas.width - 2.0 * self.margin
    }

    fn span_y(&self) -> f32 {
        self.canvas.height - 2.0 * self.margin - (self.descent - self.ascent)
    }

    fn y_offset(&self) -> f32 {
        self.margin + self.padding - self.ascent
    }

    /// Anchor pixel (checkbox left edge, baseline) for a rating pair.
    pub fn to_pixels(&self, urgency: u8, importance: u8) -> (f32, f32) {
        let (x_pct, y_pct) = percent(urgency, importance);
        let x = x_pct * self.span_x() + self.margin;
        let y = y_pct * self.span_y() + self.y_offset();
        (x, y)
    }

    /// Inverse of [`Projection::to_pixels`]: ratings for a pixel, truncated
    /// toward zero and clamped into range.
    pub fn to_attributes(&self, x: f32, y: f32) -> (u8, u8) {
        let x_pct = (x - self.margin) / self.span_x();
        let y_pct = (y - self.y_offset()) / self.span_y();
        let urgency = (100.0 * (1.0 - x_pct)).trunc() as i64;
        let importance = (100.0 * (1.0 - y_pct)).trunc() as i64;
        (clamp_rating(urgency), clamp_rating(importance))
    }
}
