use serde::Deserialize;
use taskmap::theme::Theme;
use taskmap::{Config, RenderOptions, TaskId, render_board};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardRenderOptions {
    theme: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    font_family: Option<String>,
    font_size: Option<f32>,
    fast_text: Option<bool>,
    popup: Option<u64>,
}

fn build_render_options(options: BoardRenderOptions) -> RenderOptions {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("light") {
        config.theme = Theme::light();
        config.render.background = config.theme.background.clone();
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    // No system fonts in the browser; measure with the fixed table unless asked otherwise.
    config.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    RenderOptions {
        config,
        popup: options.popup.map(TaskId),
    }
}

#[wasm_bindgen]
pub fn render_board_svg(tasks_json5: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<BoardRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        BoardRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_board(tasks_json5, &render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use taskmap::render_board;

    use crate::{BoardRenderOptions, build_render_options};

    #[test]
    fn renders_board_with_collapsed_group() {
        let tasks = r#"[
            { id: 1, label: "Taxes", urgency: 90, importance: 95 },
            { id: 2, label: "Gym", urgency: 20, importance: 70, completed: true },
            { label: "Call", urgency: 50, importance: 50 },
            { label: "Mail", urgency: 50, importance: 50 },
            { label: "Shop", urgency: 50, importance: 50 },
            { label: "Cook", urgency: 50, importance: 50 },
        ]"#;

        let svg = render_board(tasks, &build_render_options(BoardRenderOptions::default()))
            .expect("task board should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Taxes"));
        assert!(svg.contains("4 tasks"));
    }
}
