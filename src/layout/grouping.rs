use super::error::LayoutError;
use super::glyph::GlyphSizer;
use super::types::{Element, Group, Placed};

/// Collapse intersecting elements into groups until no two touch areas
/// overlap.
///
/// Pairs are scanned in key order and the first intersecting pair is merged,
/// after which the scan restarts from the beginning. Once stable, groups pick
/// up any standalone task their refreshed marker now covers; if that changes
/// anything the merge loop runs again.
pub fn group_overlaps<'a>(
    elements: &mut Vec<Element<'a>>,
    sizer: &GlyphSizer<'_>,
) -> Result<(), LayoutError> {
    let limit = elements.len();
    let mut merges = 0usize;
    loop {
        merges += merge_until_stable(elements, sizer, merges, limit)?;
        if !absorb_stragglers(elements, sizer) {
            break;
        }
    }
    tracing::debug!(
        elements = elements.len(),
        groups = elements.iter().filter(|e| e.is_group()).count(),
        merges,
        "overlap grouping converged"
    );
    Ok(())
}

fn merge_until_stable<'a>(
    elements: &mut Vec<Element<'a>>,
    sizer: &GlyphSizer<'_>,
    done: usize,
    limit: usize,
) -> Result<usize, LayoutError> {
    let mut merges = 0usize;
    loop {
        elements.sort_by_key(Element::key);
        let Some((i, j)) = first_intersecting_pair(elements) else {
            return Ok(merges);
        };
        merges += 1;
        if done + merges > limit {
            return Err(LayoutError::NonConvergence {
                merges: done + merges,
                limit,
            });
        }
        // j > i, so removing j first keeps i in place.
        let second = elements.remove(j);
        let first = elements.remove(i);
        tracing::debug!(first = %first.key(), second = %second.key(), "merging overlapping elements");
        elements.push(Element::Group(Group::merge(first, second, sizer)));
    }
}

fn first_intersecting_pair(elements: &[Element<'_>]) -> Option<(usize, usize)> {
    for (i, a) in elements.iter().enumerate() {
        let area = a.graphic().touch_area();
        for (offset, b) in elements[i + 1..].iter().enumerate() {
            if area.intersects(b.graphic().touch_area()) {
                return Some((i, i + 1 + offset));
            }
        }
    }
    None
}

/// Let every group swallow the standalone tasks its marker covers. Returns
/// whether any task was absorbed.
fn absorb_stragglers<'a>(elements: &mut Vec<Element<'a>>, sizer: &GlyphSizer<'_>) -> bool {
    let (mut groups, mut tasks): (Vec<Group<'a>>, Vec<Placed<'a>>) =
        (Vec::new(), Vec::new());
    for element in elements.drain(..) {
        match element {
            Element::Group(group) => groups.push(group),
            Element::Task(placed) => tasks.push(placed),
        }
    }

    let mut absorbed = false;
    for group in &mut groups {
        while let Some(pos) = tasks.iter().position(|placed| {
            group
                .graphic()
                .touch_area()
                .intersects(placed.graphic().touch_area())
        }) {
            let placed = tasks.remove(pos);
            tracing::debug!(group = %group.key(), task = %placed.id(), "absorbing task into group");
            group.absorb(placed, sizer);
            absorbed = true;
        }
    }

    elements.extend(groups.into_iter().map(Element::Group));
    elements.extend(tasks.into_iter().map(Element::Task));
    elements.sort_by_key(Element::key);
    absorbed
}
