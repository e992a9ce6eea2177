use crate::task::TaskId;

use super::glyph::GlyphSizer;
use super::types::{Element, Group, Placed};

/// Why a group stayed collapsed. Not an error: the collapsed marker is the
/// fallback rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum NudgeRefusal {
    /// Too many members, or the group was already force-combined.
    Ineligible { members: usize },
    /// Some member would move further than the budget allows.
    OverBudget { member: TaskId, dy: f32, limit: f32 },
    /// A moved member would land on another element or on a sibling.
    Collision { member: TaskId, other: TaskId },
}

/// Baselines for `count` rows of touch areas stacked around `origin_y`.
///
/// The stack is shifted as a whole to stay inside the vertical margins; when
/// it is taller than the canvas allows, the top margin wins.
pub fn stack_baselines(origin_y: f32, count: usize, sizer: &GlyphSizer<'_>) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let row = sizer.row_height();
    let extents = sizer.extents();
    let margin = sizer.config().margin;
    let height = sizer.canvas().height;

    let mut first = origin_y - (count - 1) as f32 * row / 2.0;
    let last = first + (count - 1) as f32 * row;
    let overflow = last + extents.lowest - (height - margin);
    if overflow > 0.0 {
        first -= overflow;
    }
    let underflow = margin - (first - extents.highest);
    if underflow > 0.0 {
        first += underflow;
    }
    (0..count).map(|n| first + n as f32 * row).collect()
}

/// Vertical offsets that spread `members` into a stack around `origin_y`,
/// in member order.
pub(crate) fn stack_offsets(
    members: &[Placed<'_>],
    origin_y: f32,
    sizer: &GlyphSizer<'_>,
) -> Vec<f32> {
    stack_baselines(origin_y, members.len(), sizer)
        .into_iter()
        .zip(members)
        .map(|(target, member)| target - member.graphic().baseline_y())
        .collect()
}

/// Per-member offsets for spreading `group` apart, or
/// [`NudgeRefusal::OverBudget`] when any would exceed the displacement budget.
pub fn plan_nudge(group: &Group<'_>, sizer: &GlyphSizer<'_>) -> Result<Vec<f32>, NudgeRefusal> {
    let (_, origin_y) = sizer
        .projection()
        .to_pixels(group.urgency(), group.importance());
    let offsets = stack_offsets(group.members(), origin_y, sizer);
    let limit = sizer.config().nudge_budget * sizer.canvas().height;
    for (member, dy) in group.members().iter().zip(&offsets) {
        if dy.abs() > limit {
            return Err(NudgeRefusal::OverBudget {
                member: member.id(),
                dy: *dy,
                limit,
            });
        }
    }
    Ok(offsets)
}

fn try_nudge(
    pos: usize,
    elements: &[Element<'_>],
    sizer: &GlyphSizer<'_>,
) -> Result<Vec<f32>, NudgeRefusal> {
    let Some(group) = elements[pos].as_group() else {
        return Err(NudgeRefusal::Ineligible { members: 1 });
    };
    if !group.nudging() {
        return Err(NudgeRefusal::Ineligible {
            members: group.len(),
        });
    }
    let offsets = plan_nudge(group, sizer)?;

    let moved: Vec<_> = group
        .members()
        .iter()
        .zip(&offsets)
        .map(|(member, dy)| (member.id(), member.graphic().touch_area().offset(0.0, *dy)))
        .collect();
    for (index, (member, area)) in moved.iter().enumerate() {
        let hit = elements
            .iter()
            .enumerate()
            .filter(|(other_pos, _)| *other_pos != pos)
            .find(|(_, other)| area.intersects(other.graphic().touch_area()))
            .map(|(_, other)| other.key());
        if let Some(other) = hit {
            return Err(NudgeRefusal::Collision {
                member: *member,
                other,
            });
        }
        if let Some((other, _)) = moved[index + 1..]
            .iter()
            .find(|(_, sibling)| area.intersects(sibling))
        {
            return Err(NudgeRefusal::Collision {
                member: *member,
                other: *other,
            });
        }
    }
    Ok(offsets)
}

/// Try to dissolve every group into vertically nudged tasks.
///
/// Groups are visited in key order; a dissolved group's members take part in
/// the collision checks of the groups after it. Groups that cannot be spread
/// are marked force-combined and kept.
pub fn resolve_groups<'a>(mut elements: Vec<Element<'a>>, sizer: &GlyphSizer<'_>) -> Vec<Element<'a>> {
    elements.sort_by_key(Element::key);
    let keys: Vec<TaskId> = elements
        .iter()
        .filter(|element| element.is_group())
        .map(Element::key)
        .collect();

    for key in keys {
        let Some(pos) = elements
            .iter()
            .position(|element| element.is_group() && element.key() == key)
        else {
            continue;
        };
        match try_nudge(pos, &elements, sizer) {
            Ok(offsets) => {
                let members = elements.remove(pos).into_members();
                tracing::debug!(group = %key, members = members.len(), "dissolved group by nudging");
                for (mut member, dy) in members.into_iter().zip(offsets) {
                    member.translate(0.0, dy);
                    elements.push(Element::Task(member));
                }
            }
            Err(NudgeRefusal::Ineligible { members }) => {
                tracing::debug!(group = %key, members, "group too large to nudge");
            }
            Err(reason) => {
                tracing::debug!(group = %key, ?reason, "nudge refused, keeping group combined");
                if let Element::Group(group) = &mut elements[pos] {
                    group.set_force_combined(true);
                }
            }
        }
    }

    elements.sort_by_key(Element::key);
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::types::Canvas;
    use crate::task::Task;
    use crate::text_metrics::FixedMeasurer;

    fn group_of<'a>(sizer: &GlyphSizer<'_>, tasks: &'a [Task]) -> Group<'a> {
        let members = tasks
            .iter()
            .map(|task| sizer.place_task(task).unwrap())
            .collect();
        Group::from_members(members, sizer)
    }

    #[test]
    fn stack_is_centered_on_origin() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(400.0, 400.0)).unwrap();
        assert_eq!(stack_baselines(208.0, 2, &sizer), vec![192.0, 224.0]);
        assert_eq!(stack_baselines(208.0, 3, &sizer), vec![176.0, 208.0, 240.0]);
        assert_eq!(stack_baselines(208.0, 1, &sizer), vec![208.0]);
        assert!(stack_baselines(208.0, 0, &sizer).is_empty());
    }

    #[test]
    fn stack_is_shifted_inside_margins() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(400.0, 400.0)).unwrap();
        // top glyph edge lands on the margin: 30 - 20 = 10
        assert_eq!(stack_baselines(30.0, 2, &sizer), vec![30.0, 62.0]);
        // bottom glyph edge lands on the margin: 386 + 4 = 390
        assert_eq!(stack_baselines(386.0, 2, &sizer), vec![354.0, 386.0]);
    }

    #[test]
    fn overfull_stack_keeps_the_top_margin() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(100.0, 100.0)).unwrap();
        let baselines = stack_baselines(58.0, 5, &sizer);
        assert_eq!(baselines[0], 30.0);
        assert_eq!(baselines[4], 158.0);
    }

    #[test]
    fn small_group_dissolves_into_separate_rows() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(400.0, 400.0)).unwrap();
        let tasks = vec![
            Task::new(TaskId(1), "Task A", 50, 50),
            Task::new(TaskId(2), "Task B", 52, 50),
        ];
        let elements = vec![Element::Group(group_of(&sizer, &tasks))];
        let resolved = resolve_groups(elements, &sizer);
        assert_eq!(resolved.len(), 2);
        let baselines: Vec<f32> = resolved
            .iter()
            .map(|e| e.graphic().baseline_y())
            .collect();
        assert_eq!(baselines, vec![192.0, 224.0]);
        assert!(!resolved[0]
            .graphic()
            .touch_area()
            .intersects(resolved[1].graphic().touch_area()));
    }

    #[test]
    fn over_budget_plan_is_refused() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(100.0, 100.0)).unwrap();
        let tasks: Vec<Task> = (1..=5)
            .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
            .collect();
        let group = group_of(&sizer, &tasks);
        match plan_nudge(&group, &sizer) {
            Err(NudgeRefusal::OverBudget { member, dy, limit }) => {
                assert_eq!(member, TaskId(1));
                assert_eq!(dy, -28.0);
                assert_eq!(limit, 25.0);
            }
            other => panic!("expected over budget, got {other:?}"),
        }
    }

    #[test]
    fn large_group_is_never_nudged() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(400.0, 400.0)).unwrap();
        let tasks: Vec<Task> = (1..=4)
            .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
            .collect();
        let group = group_of(&sizer, &tasks);
        assert!(!group.nudging());
        let resolved = resolve_groups(vec![Element::Group(group)], &sizer);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].as_group().map(Group::len), Some(4));
    }

    #[test]
    fn collision_with_neighbour_keeps_group_combined() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(400.0, 400.0)).unwrap();
        let tasks = vec![
            Task::new(TaskId(1), "Task A", 50, 50),
            Task::new(TaskId(2), "Task B", 52, 50),
        ];
        let neighbour = Task::new(TaskId(3), "Above", 50, 55);
        let elements = vec![
            Element::Group(group_of(&sizer, &tasks)),
            Element::Task(sizer.place_task(&neighbour).unwrap()),
        ];
        assert!(matches!(
            try_nudge(0, &elements, &sizer),
            Err(NudgeRefusal::Collision {
                member: TaskId(1),
                other: TaskId(3)
            })
        ));
        let resolved = resolve_groups(elements, &sizer);
        let group = resolved[0].as_group().expect("group kept");
        assert!(group.force_combined());
        assert!(!group.nudging());
    }

    #[test]
    fn displacement_never_exceeds_budget() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let sizer = GlyphSizer::new(&measure, &config, Canvas::new(200.0, 200.0)).unwrap();
        for importance in (0..=100).step_by(10) {
            let tasks = vec![
                Task::new(TaskId(1), "One", 50, importance),
                Task::new(TaskId(2), "Two", 50, importance),
                Task::new(TaskId(3), "Three", 50, importance),
            ];
            let group = group_of(&sizer, &tasks);
            if let Ok(offsets) = plan_nudge(&group, &sizer) {
                assert!(offsets.iter().all(|dy| dy.abs() <= 50.0));
            }
        }
    }
}
