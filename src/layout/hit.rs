use super::popup::PopupLayout;
use super::types::{Element, Partition, Placed};

impl<'a> Partition<'a> {
    /// First element, in layout order, whose touch area contains the point.
    pub fn hit(&self, x: f32, y: f32) -> Option<&Element<'a>> {
        self.elements()
            .iter()
            .find(|element| element.graphic().touch_area().contains(x, y))
    }
}

impl<'a> PopupLayout<'a> {
    /// Member under a point given in popup-local coordinates.
    pub fn hit(&self, x: f32, y: f32) -> Option<&Placed<'a>> {
        self.members()
            .iter()
            .find(|member| member.graphic().touch_area().contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LayoutConfig;
    use crate::layout::{Canvas, compute_layout};
    use crate::task::{Task, TaskId};
    use crate::text_metrics::FixedMeasurer;

    #[test]
    fn hit_finds_task_under_point() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let tasks = vec![
            Task::new(TaskId(1), "Ship", 90, 90),
            Task::new(TaskId(2), "Rest", 10, 10),
        ];
        let partition =
            compute_layout(&tasks, Canvas::new(400.0, 400.0), &measure, &config).unwrap();
        let area = *partition.elements()[1].graphic().touch_area();
        let hit = partition.hit(area.left + 1.0, area.top + 1.0).unwrap();
        assert_eq!(hit.key(), TaskId(2));
        assert!(partition.hit(399.0, 1.0).is_none());
    }

    #[test]
    fn touch_area_edges_are_half_open() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let tasks = vec![Task::new(TaskId(7), "Edge", 50, 50)];
        let partition =
            compute_layout(&tasks, Canvas::new(400.0, 400.0), &measure, &config).unwrap();
        let area = *partition.elements()[0].graphic().touch_area();
        assert!(partition.hit(area.left, area.top).is_some());
        assert!(partition.hit(area.right, area.top).is_none());
        assert!(partition.hit(area.left, area.bottom).is_none());
    }

    #[test]
    fn hit_reports_collapsed_group() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let tasks: Vec<Task> = (1..=5)
            .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
            .collect();
        let partition =
            compute_layout(&tasks, Canvas::new(100.0, 100.0), &measure, &config).unwrap();
        let area = *partition.elements()[0].graphic().touch_area();
        let hit = partition.hit(area.left + 2.0, area.top + 2.0).unwrap();
        let group = hit.as_group().expect("collapsed group");
        assert_eq!(group.len(), 5);
        assert!(!group.nudging());
    }
}
