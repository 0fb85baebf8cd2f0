mod enrichment;
mod selector;
mod types;

pub use enrichment::{EnrichmentCache, DEFAULT_CAPACITY as DEFAULT_ENRICHMENT_CAPACITY};
pub use selector::pick_best;
pub use types::{AircraftDetails, Observation};

use std::collections::HashMap;

use crate::render::Color;

const SHORT_FINAL_FT: f64 = 1000.0;
const MID_APPROACH_FT: f64 = 2500.0;

pub fn status_color(altitude_ft: Option<f64>) -> Color {
    match altitude_ft {
        None => Color::WHITE,
        Some(alt) if alt < SHORT_FINAL_FT => Color::RED,
        Some(alt) if alt < MID_APPROACH_FT => Color::AMBER,
        Some(_) => Color::GREEN,
    }
}

pub fn altitude_text(altitude_ft: Option<f64>) -> Option<String> {
    altitude_ft.map(|alt| format!("{:.0} FT", alt))
}

/// Callsign plus the two detail lines shown for an aircraft.
pub fn flight_lines(
    obs: &Observation,
    details: Option<&AircraftDetails>,
    airports: &HashMap<String, String>,
) -> (String, String, String) {
    let callsign = details
        .and_then(|d| non_empty(d.callsign.as_deref()))
        .or_else(|| non_empty(Some(obs.callsign.as_str())))
        .unwrap_or(obs.identifier.as_str())
        .to_string();

    let altitude = altitude_text(obs.altitude_ft);

    let type_and_reg: Vec<&str> = details
        .map(|d| {
            [d.aircraft_type.as_deref(), d.registration.as_deref()]
                .into_iter()
                .filter_map(non_empty)
                .collect()
        })
        .unwrap_or_default();
    let line2 = if type_and_reg.is_empty() {
        altitude.clone().unwrap_or_default()
    } else {
        type_and_reg.join(" ")
    };

    let origin = details.and_then(|d| non_empty(d.origin_airport_code.as_deref()));
    let line3 = match origin {
        Some(code) => {
            let place = airports
                .get(&code.to_uppercase())
                .map(String::as_str)
                .unwrap_or(code);
            format!("FROM {}", place)
        }
        // altitude already took line2 when there were no details
        None if type_and_reg.is_empty() => String::new(),
        None => altitude.unwrap_or_default(),
    };

    (callsign, line2, line3)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
