use serde::Deserialize;

use crate::arbiter::DisplayPayload;

use super::color::Color;
use super::text::{Align, Line};

/// Baselines of the three text rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LayoutSpec {
    pub rows: [i32; 3],
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self { rows: [9, 20, 31] }
    }
}

pub fn layout(payload: &DisplayPayload, spec: &LayoutSpec) -> Vec<Line> {
    let [top, middle, bottom] = spec.rows;
    let lines = match payload {
        DisplayPayload::Flight {
            callsign,
            line2,
            line3,
            status_color,
        } => vec![
            Line::new(callsign, *status_color, Align::Center, top),
            Line::new(line2, Color::WHITE, Align::Center, middle),
            Line::new(line3, Color::WHITE, Align::Center, bottom),
        ],
        // tracked team on top, period in the top right corner
        DisplayPayload::Sport {
            our_abbr,
            our_score,
            opp_abbr,
            opp_score,
            period_label,
            color_rule,
        } => vec![
            Line::new(
                format!("{} {}", our_abbr, our_score),
                color_rule.color(),
                Align::Left,
                top,
            ),
            Line::new(
                format!("{} {}", opp_abbr, opp_score),
                Color::WHITE,
                Align::Left,
                middle,
            ),
            Line::new(period_label, Color::AMBER, Align::Right, top),
        ],
        DisplayPayload::Weather {
            temp_text,
            temp_color,
            wind_text,
        } => vec![
            Line::new(temp_text, *temp_color, Align::Center, top),
            Line::new(wind_text, Color::WHITE, Align::Center, middle),
        ],
        DisplayPayload::Idle => Vec::new(),
    };

    lines.into_iter().filter(|l| !l.text.is_empty()).collect()
}
