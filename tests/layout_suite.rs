use std::path::Path;

use taskmap::layout::{Canvas, Element, Partition};
use taskmap::render::render_board_svg;
use taskmap::text_metrics::FixedMeasurer;
use taskmap::theme::Theme;
use taskmap::{GradientPalette, LayoutConfig, Task, TaskId, compute_layout, parse_tasks};

fn measure() -> FixedMeasurer {
    FixedMeasurer::monospace(8.0, 12.0, 4.0)
}

fn load_fixture(name: &str) -> Vec<Task> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_tasks(&input).expect("fixture parse failed")
}

fn assert_no_overlaps(partition: &Partition<'_>, fixture: &str) {
    let elements = partition.elements();
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            assert!(
                !a.graphic().touch_area().intersects(b.graphic().touch_area()),
                "{fixture}: {} overlaps {}",
                a.key(),
                b.key()
            );
        }
    }
}

fn visible_count(partition: &Partition<'_>) -> usize {
    partition
        .elements()
        .iter()
        .map(|element| match element {
            Element::Task(_) => 1,
            Element::Group(group) => group.len(),
        })
        .sum()
}

#[test]
fn render_all_fixtures() {
    let config = LayoutConfig::default();
    let theme = Theme::classic();
    let palette = GradientPalette::from_theme(&theme).unwrap();
    let measure = measure();

    for fixture in ["pair.json5", "spread.json5", "crowded.json5"] {
        let tasks = load_fixture(fixture);
        let partition = compute_layout(&tasks, Canvas::new(400.0, 400.0), &measure, &config)
            .unwrap_or_else(|err| panic!("{fixture}: layout failed: {err}"));
        assert_no_overlaps(&partition, fixture);
        assert_eq!(visible_count(&partition), tasks.len(), "{fixture}: lost tasks");

        let svg = render_board_svg(&partition, &theme, &palette, &config, "#FFFFFF");
        assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    }
}

#[test]
fn nearby_pair_is_grouped_then_nudged_apart() {
    let tasks = load_fixture("pair.json5");
    let config = LayoutConfig::default();
    let measure = measure();
    let canvas = Canvas::new(400.0, 400.0);

    // Before nudging the two glyphs overlap and collapse into one group.
    let sizer = taskmap::layout::GlyphSizer::new(&measure, &config, canvas).unwrap();
    let mut elements: Vec<Element<'_>> = tasks
        .iter()
        .map(|task| Element::Task(sizer.place_task(task).unwrap()))
        .collect();
    taskmap::layout::group_overlaps(&mut elements, &sizer).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].as_group().map(|g| g.len()), Some(2));

    // The full pass then spreads them into two rows.
    let partition = compute_layout(&tasks, canvas, &measure, &config).unwrap();
    assert_eq!(partition.len(), 2);
    assert_eq!(partition.groups().count(), 0);
    let a = partition.elements()[0].graphic();
    let b = partition.elements()[1].graphic();
    assert_ne!(a.baseline_y(), b.baseline_y());
    assert!(!a.touch_area().intersects(b.touch_area()));
    for placed in partition.tasks() {
        let dy = placed.graphic().baseline_y() - 208.0;
        assert!(dy.abs() <= 0.25 * canvas.height);
    }
}

#[test]
fn five_items_on_small_canvas_stay_combined() {
    let tasks: Vec<Task> = (1..=5)
        .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
        .collect();
    let config = LayoutConfig::default();
    let measure = measure();
    let partition = compute_layout(&tasks, Canvas::new(100.0, 100.0), &measure, &config).unwrap();

    assert_eq!(partition.len(), 1);
    let group = partition.elements()[0].as_group().expect("one group");
    assert_eq!(group.len(), 5);
    assert!(!group.nudging());
    assert_eq!(group.label(), "5 tasks");
}

#[test]
fn three_items_over_budget_become_force_combined() {
    let tasks: Vec<Task> = (1..=3)
        .map(|n| Task::new(TaskId(n), format!("Task {n}"), 50, 50))
        .collect();
    let config = LayoutConfig {
        nudge_budget: 0.05,
        ..LayoutConfig::default()
    };
    let measure = measure();
    let partition = compute_layout(&tasks, Canvas::new(400.0, 400.0), &measure, &config).unwrap();

    let group = partition.elements()[0].as_group().expect("one group");
    assert_eq!(group.len(), 3);
    assert!(group.force_combined());
    assert!(!group.nudging());
}

#[test]
fn gradient_hits_reference_colors_at_anchors() {
    let palette = GradientPalette::from_theme(&Theme::classic()).unwrap();
    assert_eq!(palette.color_for(100, 100), palette.high);
    assert_eq!(palette.color_for(0, 0), palette.low);
    assert_eq!(palette.color_for(50, 50), palette.mid);
}

#[test]
fn out_of_range_ratings_are_clamped_on_load() {
    let tasks = load_fixture("crowded.json5");
    let dentist = tasks
        .iter()
        .find(|task| task.label() == "Book dentist")
        .unwrap();
    assert_eq!((dentist.urgency(), dentist.importance()), (100, 0));
}

#[test]
fn layout_pass_is_idempotent() {
    let tasks = load_fixture("crowded.json5");
    let config = LayoutConfig::default();
    let measure = measure();
    let canvas = Canvas::new(400.0, 400.0);
    let first = compute_layout(&tasks, canvas, &measure, &config).unwrap();
    let second = compute_layout(&tasks, canvas, &measure, &config).unwrap();
    assert_eq!(first, second);
}
