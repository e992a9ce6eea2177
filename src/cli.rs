use crate::config::load_config;
use crate::gradient::GradientPalette;
use crate::layout::{Canvas, compute_layout, compute_popup};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_board_svg, render_popup_svg, write_output_png, write_output_svg};
use crate::measurer_for;
use crate::task::{Task, TaskId, parse_tasks};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "taskmap", version, about = "Lay out tasks on an urgency/importance board")]
pub struct Args {
    /// Task file (JSON5 array of records) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Draw the popup of the group holding this task id instead of the board
    #[arg(long = "popup", value_name = "TASK_ID")]
    pub popup: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let tasks: Vec<Task> = parse_tasks(&input)?;
    tracing::info!(tasks = tasks.len(), "loaded task file");

    let canvas = Canvas::new(config.render.width, config.render.height);
    let measure = measurer_for(&config);
    let palette = GradientPalette::from_theme(&config.theme)?;
    let partition = compute_layout(&tasks, canvas, measure.as_ref(), &config.layout)?;

    if args.output_format == OutputFormat::Json {
        let dump = LayoutDump::from_partition(&partition, &palette);
        return write_layout_dump(args.output.as_deref(), &dump);
    }

    let svg = match args.popup.map(TaskId) {
        Some(id) => {
            let group = partition
                .group_containing(id)
                .ok_or_else(|| anyhow::anyhow!("task {id} is not part of a collapsed group"))?;
            let popup = compute_popup(group, canvas, measure.as_ref(), &config.layout, &palette)?;
            config.render.width = popup.width();
            config.render.height = popup.height();
            render_popup_svg(&popup, &config.theme, &config.layout)
        }
        None => render_board_svg(
            &partition,
            &config.theme,
            &palette,
            &config.layout,
            &config.render.background,
        ),
    };

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)
        }
        OutputFormat::Json => Ok(()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_flags() {
        let args = Args::try_parse_from([
            "taskmap",
            "-i",
            "tasks.json5",
            "-e",
            "json",
            "-w",
            "640",
            "--popup",
            "3",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("tasks.json5")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.height, None);
        assert_eq!(args.popup, Some(3));
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
