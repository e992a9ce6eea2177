use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub checkbox_color: String,
    pub checkbox_stroke_width: f32,
    pub group_stroke_color: String,
    pub popup_border_color: String,
    pub popup_border_width: f32,
    pub gradient_high: String,
    pub gradient_mid: String,
    pub gradient_low: String,
    /// Paint the high→mid→low gradient behind the board.
    pub gradient_background: bool,
    pub background: String,
}

impl Theme {
    /// White glyphs on the red/yellow/green board.
    pub fn classic() -> Self {
        Self {
            font_family: "Roboto, \"Segoe UI\", system-ui, sans-serif".to_string(),
            font_size: 30.0,
            text_color: "#FFFFFF".to_string(),
            checkbox_color: "#FFFFFF".to_string(),
            checkbox_stroke_width: 2.0,
            group_stroke_color: "#000000".to_string(),
            popup_border_color: "#000000".to_string(),
            popup_border_width: 2.0,
            gradient_high: "#D32F2F".to_string(),
            gradient_mid: "#FBC02D".to_string(),
            gradient_low: "#388E3C".to_string(),
            gradient_background: true,
            background: "#FFFFFF".to_string(),
        }
    }

    /// Dark glyphs on a plain background with a softer gradient for groups.
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 16.0,
            text_color: "#1C2430".to_string(),
            checkbox_color: "#1C2430".to_string(),
            checkbox_stroke_width: 1.5,
            group_stroke_color: "#7A8AA6".to_string(),
            popup_border_color: "#C7D2E5".to_string(),
            popup_border_width: 1.0,
            gradient_high: "#F8B4B4".to_string(),
            gradient_mid: "#FDE68A".to_string(),
            gradient_low: "#A7F3D0".to_string(),
            gradient_background: false,
            background: "#FFFFFF".to_string(),
        }
    }
}
