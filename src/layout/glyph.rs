use crate::config::LayoutConfig;
use crate::task::Task;
use crate::text_metrics::TextMeasure;

use super::coords::Projection;
use super::error::LayoutError;
use super::types::{Canvas, Graphic, Placed, Rect};

/// Vertical reach of a glyph around its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphExtents {
    /// Distance from the baseline up to the top of the checkbox or text.
    pub highest: f32,
    /// Distance from the baseline down to the bottom of the text.
    pub lowest: f32,
}

impl GlyphExtents {
    pub fn height(&self) -> f32 {
        self.highest + self.lowest
    }
}

/// Sizes checkbox + text glyphs for one canvas, font and configuration.
pub struct GlyphSizer<'m> {
    measure: &'m dyn TextMeasure,
    config: &'m LayoutConfig,
    projection: Projection,
    extents: GlyphExtents,
}

impl<'m> GlyphSizer<'m> {
    pub fn new(
        measure: &'m dyn TextMeasure,
        config: &'m LayoutConfig,
        canvas: Canvas,
    ) -> Result<Self, LayoutError> {
        let (ascent, descent) = measure.vertical_metrics();
        let projection = Projection::new(canvas, config.margin, config.padding, ascent, descent)?;
        let extents = GlyphExtents {
            highest: ascent.abs().max(config.checkbox_side),
            lowest: descent.abs(),
        };
        Ok(Self {
            measure,
            config,
            projection,
            extents,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn canvas(&self) -> Canvas {
        self.projection.canvas()
    }

    pub fn extents(&self) -> GlyphExtents {
        self.extents
    }

    /// Height of one touch area, i.e. one row of a nudged stack.
    pub fn row_height(&self) -> f32 {
        self.extents.height() + 2.0 * self.config.padding
    }

    /// Place a task at its own ratings. Empty labels are a caller error.
    pub fn place_task<'a>(&self, task: &'a Task) -> Result<Placed<'a>, LayoutError> {
        if task.label().trim().is_empty() {
            return Err(LayoutError::EmptyLabel { id: task.id() });
        }
        let graphic = self.place_label(task.label(), task.urgency(), task.importance());
        Ok(Placed::new(task, graphic))
    }

    pub fn place_label(&self, label: &str, urgency: u8, importance: u8) -> Graphic {
        let anchor = self.projection.to_pixels(urgency, importance);
        self.place_at(label, anchor)
    }

    /// Size the glyph for `label` with its checkbox anchored at `anchor`,
    /// pulled back inside the canvas margins where it would cross them.
    pub fn place_at(&self, label: &str, anchor: (f32, f32)) -> Graphic {
        let canvas = self.canvas();
        let margin = self.config.margin;
        let padding = self.config.padding;
        let GlyphExtents { highest, lowest } = self.extents;
        let width =
            self.config.checkbox_side + self.config.spacing + self.measure.text_width(label);

        let (mut x, mut y) = anchor;
        if y - highest < margin {
            y = highest + margin;
        }
        if y + lowest > canvas.height - margin {
            y = canvas.height - lowest - margin;
        }
        if x + width > canvas.width - margin {
            x = canvas.width - margin - width;
        }
        if x < margin {
            x = margin;
        }

        let text_x = x + self.config.checkbox_side + self.config.spacing;
        let touch_area = Rect::new(
            x - padding,
            y - highest - padding,
            x + width + padding,
            y + lowest + padding,
        );
        Graphic::new(y, x, text_x, touch_area)
    }
}
