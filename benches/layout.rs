use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use taskmap::config::LayoutConfig;
use taskmap::gradient::GradientPalette;
use taskmap::layout::{Canvas, compute_layout};
use taskmap::render::render_board_svg;
use taskmap::task::{Task, TaskId, parse_tasks};
use taskmap::text_metrics::FixedMeasurer;
use taskmap::theme::Theme;
use std::hint::black_box;

/// `count` tasks scattered over a band of the board; a narrow band forces
/// many merges and nudges.
fn dense_board(count: usize, spread: i64) -> Vec<Task> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (state >> 33) as i64
    };
    (0..count)
        .map(|idx| {
            let urgency = 50 - spread / 2 + next() % (spread + 1);
            let importance = 50 - spread / 2 + next() % (spread + 1);
            Task::new(TaskId(idx as u64 + 1), format!("Task {idx}"), urgency, importance)
        })
        .collect()
}

fn fixture(name: &str) -> Vec<Task> {
    let source = match name {
        "crowded" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/crowded.json5")),
        "spread" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/spread.json5")),
        _ => panic!("unknown fixture"),
    };
    parse_tasks(source).expect("fixture parse failed")
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    let measure = FixedMeasurer::new(30.0);
    let canvas = Canvas::new(400.0, 400.0);

    for (name, tasks) in [
        ("fixture_spread", fixture("spread")),
        ("fixture_crowded", fixture("crowded")),
        ("dense_10", dense_board(10, 30)),
        ("dense_25", dense_board(25, 40)),
        ("dense_50", dense_board(50, 60)),
        ("scattered_50", dense_board(50, 100)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tasks, |b, tasks| {
            b.iter(|| {
                let partition =
                    compute_layout(black_box(tasks), canvas, &measure, &config).expect("layout failed");
                black_box(partition.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = LayoutConfig::default();
    let theme = Theme::classic();
    let palette = GradientPalette::from_theme(&theme).expect("theme colors");
    let measure = FixedMeasurer::new(theme.font_size);
    let canvas = Canvas::new(400.0, 400.0);

    for count in [10usize, 25, 50] {
        let tasks = dense_board(count, 50);
        group.bench_with_input(BenchmarkId::from_parameter(count), &tasks, |b, tasks| {
            b.iter(|| {
                let partition =
                    compute_layout(black_box(tasks), canvas, &measure, &config).expect("layout failed");
                let svg = render_board_svg(&partition, &theme, &palette, &config, &theme.background);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_end_to_end);
criterion_main!(benches);
