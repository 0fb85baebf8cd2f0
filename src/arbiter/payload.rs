use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::flight::{self, AircraftDetails, Observation};
use crate::render::Color;
use crate::sports::{period_label, ColorRule, GameSummary};
use crate::weather::WeatherReport;

/// What the display shows for one polling tick.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayPayload {
    Flight {
        callsign: String,
        line2: String,
        line3: String,
        status_color: Color,
    },
    Sport {
        our_abbr: String,
        our_score: u32,
        opp_abbr: String,
        opp_score: u32,
        period_label: String,
        color_rule: ColorRule,
    },
    Weather {
        temp_text: String,
        temp_color: Color,
        wind_text: String,
    },
    Idle,
}

impl DisplayPayload {
    pub fn flight(
        obs: &Observation,
        details: Option<&AircraftDetails>,
        airports: &HashMap<String, String>,
    ) -> Self {
        let (callsign, line2, line3) = flight::flight_lines(obs, details, airports);
        DisplayPayload::Flight {
            callsign,
            line2,
            line3,
            status_color: flight::status_color(obs.altitude_ft),
        }
    }

    pub fn sport(game: &GameSummary) -> Self {
        DisplayPayload::Sport {
            our_abbr: game.team_abbr.clone(),
            our_score: game.team_score,
            opp_abbr: game.opp_abbr.clone(),
            opp_score: game.opp_score,
            period_label: period_label(game.period_detail.as_deref()),
            color_rule: game.color_rule(),
        }
    }

    pub fn weather(report: &WeatherReport) -> Self {
        DisplayPayload::Weather {
            temp_text: report.temp_text(),
            temp_color: report.temp_color(),
            wind_text: report.wind_text(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DisplayPayload::Flight { .. } => "flight",
            DisplayPayload::Sport { .. } => "sport",
            DisplayPayload::Weather { .. } => "weather",
            DisplayPayload::Idle => "idle",
        }
    }
}
