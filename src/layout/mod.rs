mod coords;
mod error;
mod glyph;
mod grouping;
mod hit;
mod nudge;
mod popup;
pub(crate) mod types;

pub use coords::{Projection, percent};
pub use error::LayoutError;
pub use glyph::{GlyphExtents, GlyphSizer};
pub use grouping::group_overlaps;
pub use nudge::{NudgeRefusal, plan_nudge, resolve_groups, stack_baselines};
pub use popup::{PopupLayout, layout_popup};
pub use types::*;

use crate::config::LayoutConfig;
use crate::gradient::GradientPalette;
use crate::task::Task;
use crate::text_metrics::TextMeasure;

/// Run one full layout pass over the visible tasks.
///
/// Tasks being dragged are left out. The returned partition borrows the
/// tasks, so they cannot change until it is dropped.
pub fn compute_layout<'a, I>(
    tasks: I,
    canvas: Canvas,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) -> Result<Partition<'a>, LayoutError>
where
    I: IntoIterator<Item = &'a Task>,
{
    let sizer = GlyphSizer::new(measure, config, canvas)?;
    let mut elements = tasks
        .into_iter()
        .filter(|task| !task.moving())
        .map(|task| sizer.place_task(task).map(Element::Task))
        .collect::<Result<Vec<_>, _>>()?;
    let visible = elements.len();

    group_overlaps(&mut elements, &sizer)?;
    let elements = resolve_groups(elements, &sizer);
    let partition = Partition::new(canvas, elements);
    tracing::debug!(
        tasks = visible,
        elements = partition.len(),
        groups = partition.groups().count(),
        width = canvas.width,
        height = canvas.height,
        "layout pass complete"
    );
    Ok(partition)
}

/// Popup layout for one group of a partition computed on the same canvas.
pub fn compute_popup<'a>(
    group: &Group<'a>,
    canvas: Canvas,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
    palette: &GradientPalette,
) -> Result<PopupLayout<'a>, LayoutError> {
    let sizer = GlyphSizer::new(measure, config, canvas)?;
    layout_popup(group, &sizer, palette)
}
