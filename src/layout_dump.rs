use crate::gradient::GradientPalette;
use crate::layout::{Element, Partition, Rect};
use crate::task::TaskId;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<ElementDump>,
}

#[derive(Debug, Serialize)]
pub struct ElementDump {
    pub kind: String,
    pub key: TaskId,
    pub label: String,
    pub urgency: u8,
    pub importance: u8,
    pub completed: Option<bool>,
    pub members: Vec<TaskId>,
    pub nudging: bool,
    pub color: Option<String>,
    pub baseline_y: f32,
    pub checkbox_x: f32,
    pub text_x: f32,
    pub touch_area: Rect,
}

impl LayoutDump {
    pub fn from_partition(partition: &Partition<'_>, palette: &GradientPalette) -> Self {
        let elements = partition
            .elements()
            .iter()
            .map(|element| {
                let graphic = element.graphic();
                let (kind, completed, members, nudging, color) = match element {
                    Element::Task(placed) => (
                        "task",
                        Some(placed.task().completed()),
                        vec![placed.id()],
                        false,
                        None,
                    ),
                    Element::Group(group) => (
                        "group",
                        None,
                        group.members().iter().map(|m| m.id()).collect(),
                        group.nudging(),
                        Some(
                            palette
                                .color_for(group.importance(), group.urgency())
                                .to_css(),
                        ),
                    ),
                };
                ElementDump {
                    kind: kind.to_string(),
                    key: element.key(),
                    label: element.label().to_string(),
                    urgency: element.urgency(),
                    importance: element.importance(),
                    completed,
                    members,
                    nudging,
                    color,
                    baseline_y: graphic.baseline_y(),
                    checkbox_x: graphic.checkbox_x(),
                    text_x: graphic.text_x(),
                    touch_area: *graphic.touch_area(),
                }
            })
            .collect();

        let canvas = partition.canvas();
        LayoutDump {
            width: canvas.width,
            height: canvas.height,
            elements,
        }
    }
}

/// Write the dump as pretty JSON to `path`, or to stdout when absent.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::{Canvas, compute_layout};
    use crate::task::Task;
    use crate::text_metrics::FixedMeasurer;
    use crate::theme::Theme;

    #[test]
    fn dump_lists_groups_with_members_and_color() {
        let measure = FixedMeasurer::monospace(8.0, 12.0, 4.0);
        let config = LayoutConfig::default();
        let mut tasks: Vec<Task> = (1..=4)
            .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
            .collect();
        tasks.push(Task::new(TaskId(9), "Alone", 95, 95).with_completed(true));
        let partition =
            compute_layout(&tasks, Canvas::new(400.0, 400.0), &measure, &config).unwrap();
        let palette = GradientPalette::from_theme(&Theme::classic()).unwrap();
        let dump = LayoutDump::from_partition(&partition, &palette);

        assert_eq!(dump.elements.len(), 2);
        let group = &dump.elements[0];
        assert_eq!(group.kind, "group");
        assert_eq!(group.members.len(), 4);
        assert_eq!(group.color.as_deref(), Some("#FBC02D"));
        assert!(!group.nudging);
        let alone = &dump.elements[1];
        assert_eq!(alone.kind, "task");
        assert_eq!(alone.completed, Some(true));

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["elements"][0]["key"], 1);
        assert_eq!(json["elements"][1]["touch_area"]["left"], alone.touch_area.left as f64);
    }
}
