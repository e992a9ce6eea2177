use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Distance kept between every glyph and the canvas edge.
    pub margin: f32,
    /// Gap between the checkbox and the label text.
    pub spacing: f32,
    pub checkbox_side: f32,
    /// Inflation of the glyph rectangle on every side to form the touch area.
    pub padding: f32,
    /// Largest vertical nudge allowed, as a fraction of the canvas height.
    pub nudge_budget: f32,
    /// Groups with more members than this are never nudged apart.
    pub max_nudge_members: usize,
    pub popup_padding: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            spacing: 10.0,
            checkbox_side: 20.0,
            padding: 4.0,
            nudge_budget: 0.25,
            max_nudge_members: 3,
            popup_padding: 20.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    checkbox_color: Option<String>,
    checkbox_stroke_width: Option<f32>,
    group_stroke_color: Option<String>,
    popup_border_color: Option<String>,
    popup_border_width: Option<f32>,
    gradient_high: Option<String>,
    gradient_mid: Option<String>,
    gradient_low: Option<String>,
    gradient_background: Option<bool>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    margin: Option<f32>,
    spacing: Option<f32>,
    checkbox_side: Option<f32>,
    padding: Option<f32>,
    nudge_budget: Option<f32>,
    max_nudge_members: Option<usize>,
    popup_padding: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    match parsed.theme.as_deref() {
        Some("light") => config.theme = Theme::light(),
        Some("classic") | Some("default") | None => {}
        Some(other) => anyhow::bail!("unknown theme {other:?} (expected \"classic\" or \"light\")"),
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.checkbox_color {
            theme.checkbox_color = v;
        }
        if let Some(v) = vars.checkbox_stroke_width {
            theme.checkbox_stroke_width = v;
        }
        if let Some(v) = vars.group_stroke_color {
            theme.group_stroke_color = v;
        }
        if let Some(v) = vars.popup_border_color {
            theme.popup_border_color = v;
        }
        if let Some(v) = vars.popup_border_width {
            theme.popup_border_width = v;
        }
        if let Some(v) = vars.gradient_high {
            theme.gradient_high = v;
        }
        if let Some(v) = vars.gradient_mid {
            theme.gradient_mid = v;
        }
        if let Some(v) = vars.gradient_low {
            theme.gradient_low = v;
        }
        if let Some(v) = vars.gradient_background {
            theme.gradient_background = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.margin {
            target.margin = v;
        }
        if let Some(v) = layout.spacing {
            target.spacing = v;
        }
        if let Some(v) = layout.checkbox_side {
            target.checkbox_side = v;
        }
        if let Some(v) = layout.padding {
            target.padding = v;
        }
        if let Some(v) = layout.nudge_budget {
            target.nudge_budget = v;
        }
        if let Some(v) = layout.max_nudge_members {
            target.max_nudge_members = v;
        }
        if let Some(v) = layout.popup_padding {
            target.popup_padding = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
