pub mod board;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod gradient;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod task;
pub mod text_metrics;
pub mod theme;

pub use board::{Board, DoubleTapOutcome, TapOutcome};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use gradient::GradientPalette;
pub use layout::{Canvas, Element, Group, LayoutError, Partition, compute_layout, compute_popup};
pub use task::{MemoryStore, NewTask, Task, TaskId, TaskStore, parse_tasks};

use text_metrics::{FixedMeasurer, FontMeasurer, TextMeasure};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    /// Render the popup of the group holding this task instead of the board.
    pub popup: Option<TaskId>,
}

/// Text measurer selected by the configuration.
pub fn measurer_for(config: &Config) -> Box<dyn TextMeasure> {
    if config.layout.fast_text_metrics {
        Box::new(FixedMeasurer::new(config.theme.font_size))
    } else {
        Box::new(FontMeasurer::new(
            config.theme.font_family.clone(),
            config.theme.font_size,
        ))
    }
}

/// Lay out and draw `tasks` as an SVG document.
pub fn render_tasks_svg(tasks: &[Task], options: &RenderOptions) -> anyhow::Result<String> {
    let config = &options.config;
    let canvas = Canvas::new(config.render.width, config.render.height);
    let measure = measurer_for(config);
    let palette = GradientPalette::from_theme(&config.theme)?;
    let partition = compute_layout(tasks, canvas, measure.as_ref(), &config.layout)?;

    let Some(id) = options.popup else {
        return Ok(render::render_board_svg(
            &partition,
            &config.theme,
            &palette,
            &config.layout,
            &config.render.background,
        ));
    };
    let group = partition
        .group_containing(id)
        .ok_or_else(|| anyhow::anyhow!("task {id} is not part of a collapsed group"))?;
    let popup = compute_popup(group, canvas, measure.as_ref(), &config.layout, &palette)?;
    Ok(render::render_popup_svg(&popup, &config.theme, &config.layout))
}

/// Parse a JSON5 task list and render it.
pub fn render_board(tasks_json5: &str, options: &RenderOptions) -> anyhow::Result<String> {
    let tasks = parse_tasks(tasks_json5)?;
    render_tasks_svg(&tasks, options)
}
