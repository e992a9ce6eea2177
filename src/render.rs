use crate::config::{LayoutConfig, RenderConfig};
use crate::gradient::GradientPalette;
use crate::layout::{Element, Graphic, Group, Partition, Placed, PopupLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Draw a laid-out board: background, standalone tasks and collapsed group
/// markers, in partition order.
pub fn render_board_svg(
    partition: &Partition<'_>,
    theme: &Theme,
    palette: &GradientPalette,
    config: &LayoutConfig,
    background: &str,
) -> String {
    let canvas = partition.canvas();
    let (width, height) = (canvas.width, canvas.height);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(background)
    ));

    if theme.gradient_background {
        // high importance and urgency sit top-left, so the gradient runs
        // down the diagonal toward bottom-right
        svg.push_str("<defs><linearGradient id=\"board-gradient\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">");
        for (offset, color) in [
            ("0%", palette.high),
            ("50%", palette.mid),
            ("100%", palette.low),
        ] {
            svg.push_str(&format!(
                "<stop offset=\"{offset}\" stop-color=\"{}\"/>",
                color.to_css()
            ));
        }
        svg.push_str("</linearGradient></defs>");
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#board-gradient)\"/>");
    }

    for element in partition.elements() {
        match element {
            Element::Task(placed) => task_svg(&mut svg, placed, theme, config),
            Element::Group(group) => group_svg(&mut svg, group, theme, palette, config),
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Draw a group popup in its own frame, filled with the group's gradient
/// color.
pub fn render_popup_svg(popup: &PopupLayout<'_>, theme: &Theme, config: &LayoutConfig) -> String {
    let (width, height) = (popup.width(), popup.height());
    let border = theme.popup_border_width;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{border}\"/>",
        border / 2.0,
        border / 2.0,
        (width - border).max(0.0),
        (height - border).max(0.0),
        popup.background().to_css(),
        escape_xml(&theme.popup_border_color),
    ));
    for member in popup.members() {
        task_svg(&mut svg, member, theme, config);
    }
    svg.push_str("</svg>");
    svg
}

fn task_svg(svg: &mut String, placed: &Placed<'_>, theme: &Theme, config: &LayoutConfig) {
    let task = placed.task();
    glyph_svg(svg, placed.graphic(), task.label(), theme, config, "");
    if task.completed() {
        svg.push_str(&checkmark_svg(placed.graphic(), theme, config));
    }
}

fn group_svg(
    svg: &mut String,
    group: &Group<'_>,
    theme: &Theme,
    palette: &GradientPalette,
    config: &LayoutConfig,
) {
    let area = group.graphic().touch_area();
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        area.left,
        area.top,
        area.width(),
        area.height(),
        palette.color_for(group.importance(), group.urgency()).to_css(),
        escape_xml(&theme.group_stroke_color),
    ));
    glyph_svg(
        svg,
        group.graphic(),
        group.label(),
        theme,
        config,
        " stroke-dasharray=\"4 3\"",
    );
}

fn glyph_svg(
    svg: &mut String,
    graphic: &Graphic,
    label: &str,
    theme: &Theme,
    config: &LayoutConfig,
    box_extra: &str,
) {
    let side = config.checkbox_side;
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{side}\" height=\"{side}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{box_extra}/>",
        graphic.checkbox_x(),
        graphic.baseline_y() - side,
        escape_xml(&theme.checkbox_color),
        theme.checkbox_stroke_width,
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        graphic.text_x(),
        graphic.baseline_y(),
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.text_color),
        escape_xml(label)
    ));
}

fn checkmark_svg(graphic: &Graphic, theme: &Theme, config: &LayoutConfig) -> String {
    let side = config.checkbox_side;
    let (x, bottom) = (graphic.checkbox_x(), graphic.baseline_y());
    let points = [
        (x + side * 0.2, bottom - side * 0.5),
        (x + side * 0.42, bottom - side * 0.22),
        (x + side * 0.85, bottom - side * 0.82),
    ];
    format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
        points_to_path(&points),
        escape_xml(&theme.checkbox_color),
        theme.checkbox_stroke_width * 1.5,
    )
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
