use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};

use crate::web::auth::AppState;

use super::templates::{DashboardTemplate, PanelText};

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.status.snapshot();
    let (width_px, height_px, texts) = match &status.frame {
        Some(frame) => (
            frame.width_px,
            frame.height_px,
            frame.ops.iter().map(PanelText::from).collect(),
        ),
        None => (
            state.config.display.width_px,
            state.config.display.height_px,
            Vec::new(),
        ),
    };

    DashboardTemplate {
        mode: format!("{:?}", status.mode).to_lowercase(),
        kind: status.payload.kind().to_string(),
        since: timestamp(status.payload_since),
        last_poll: timestamp(status.last_poll),
        last_best: status
            .last_best
            .map(|obs| format!("{} ({})", obs.callsign, obs.identifier)),
        width_px,
        height_px,
        texts,
    }
}
