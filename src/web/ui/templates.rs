use askama::Template;
use askama_web::WebTemplate;

use crate::render::DrawOp;

/// One drawn text run, positioned for the HTML panel mirror.
pub struct PanelText {
    pub x: i32,
    pub y: i32,
    pub color: String,
    pub text: String,
}

impl From<&DrawOp> for PanelText {
    fn from(op: &DrawOp) -> Self {
        PanelText {
            x: op.x,
            y: op.y,
            color: op.color.hex(),
            text: op.text.clone(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub mode: String,
    pub kind: String,
    pub since: String,
    pub last_poll: String,
    pub last_best: Option<String>,
    pub width_px: i32,
    pub height_px: i32,
    pub texts: Vec<PanelText>,
}
