use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 40, 40);
    pub const AMBER: Color = Color::rgb(255, 160, 0);
    pub const ORANGE: Color = Color::rgb(255, 110, 0);
    pub const YELLOW: Color = Color::rgb(255, 220, 0);
    pub const GREEN: Color = Color::rgb(0, 220, 60);
    pub const CYAN: Color = Color::rgb(0, 200, 220);
    pub const BLUE: Color = Color::rgb(60, 120, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
