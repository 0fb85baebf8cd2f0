use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::color::Color;
use super::error::DisplayError;

/// Draw sink for the renderer. Coordinates are pixels; `y` is the text
/// baseline. Nothing is visible until `present`.
pub trait TextRenderer {
    fn measure(&self, text: &str) -> i32;
    fn draw_at(&mut self, x: i32, y: i32, color: Color, text: &str) -> Result<(), DisplayError>;
    fn clear(&mut self) -> Result<(), DisplayError>;
    fn present(&mut self) -> Result<(), DisplayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ViewportSpec {
    pub width_px: i32,
    pub margin_px: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub color: Color,
    pub align: Align,
    pub y: i32,
}

impl Line {
    pub fn new(text: impl Into<String>, color: Color, align: Align, y: i32) -> Self {
        Self {
            text: text.into(),
            color,
            align,
            y,
        }
    }
}

/// Horizontal position of a line that fits the viewport.
pub fn place_x(align: Align, text_width: i32, viewport: &ViewportSpec) -> i32 {
    let margin = viewport.margin_px;
    let upper = viewport.width_px - margin - text_width;
    match align {
        Align::Left => margin,
        Align::Right => upper.max(margin),
        Align::Center => {
            let center = (viewport.width_px - text_width) / 2;
            // fits the viewport but not the margins
            if upper < margin {
                center
            } else {
                center.clamp(margin, upper)
            }
        }
    }
}
