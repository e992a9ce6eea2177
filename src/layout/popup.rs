use crate::color::Rgba;
use crate::gradient::GradientPalette;

use super::error::LayoutError;
use super::glyph::GlyphSizer;
use super::nudge::stack_offsets;
use super::types::{Group, Placed, Rect};

/// One group's members spread out in a popup of their own. Coordinates are
/// local to the popup, whose top-left corner is (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct PopupLayout<'a> {
    members: Vec<Placed<'a>>,
    background: Rgba,
    width: f32,
    height: f32,
    urgency: u8,
    importance: u8,
}

impl<'a> PopupLayout<'a> {
    /// Members in stacking order, most important first.
    pub fn members(&self) -> &[Placed<'a>] {
        &self.members
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    pub fn importance(&self) -> u8 {
        self.importance
    }
}

/// Lay out `group`'s members for the popup: fresh glyphs, stacked around
/// the group's baseline without a displacement budget, then moved so their
/// union sits `popup_padding` in from the popup's corner.
pub fn layout_popup<'a>(
    group: &Group<'a>,
    sizer: &GlyphSizer<'_>,
    palette: &GradientPalette,
) -> Result<PopupLayout<'a>, LayoutError> {
    let mut members = group
        .members()
        .iter()
        .map(|member| sizer.place_task(member.task()))
        .collect::<Result<Vec<_>, _>>()?;

    let (_, origin_y) = sizer
        .projection()
        .to_pixels(group.urgency(), group.importance());
    let offsets = stack_offsets(&members, origin_y, sizer);
    for (member, dy) in members.iter_mut().zip(offsets) {
        member.translate(0.0, dy);
    }

    // Groups always hold members; an empty one yields a bare padded frame.
    let bounds = members
        .iter()
        .map(|member| *member.graphic().touch_area())
        .reduce(|acc, area| acc.union(&area))
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));

    let padding = sizer.config().popup_padding;
    let (dx, dy) = (padding - bounds.left, padding - bounds.top);
    for member in &mut members {
        member.translate(dx, dy);
    }
    let frame = Rect::new(
        0.0,
        0.0,
        bounds.width() + 2.0 * padding,
        bounds.height() + 2.0 * padding,
    );
    tracing::debug!(
        group = %group.key(),
        members = members.len(),
        width = frame.width(),
        height = frame.height(),
        "laid out group popup"
    );

    Ok(PopupLayout {
        members,
        background: palette.color_for(group.importance(), group.urgency()),
        width: frame.width(),
        height: frame.height(),
        urgency: group.urgency(),
        importance: group.importance(),
    })
}
