use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::render::Color;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];
const CALM_BELOW_MPH: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReport {
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub wind_mph: Option<f64>,
    /// Direction the wind blows from, degrees clockwise from north.
    #[serde(default)]
    pub wind_degree: Option<f64>,
}

impl WeatherReport {
    pub fn temp_text(&self) -> String {
        match self.temp_f {
            Some(t) => format!("{:.0}F", t),
            None => "--F".to_string(),
        }
    }

    pub fn temp_color(&self) -> Color {
        match self.temp_f {
            None => Color::WHITE,
            Some(t) if t <= 45.0 => Color::BLUE,
            Some(t) if t <= 60.0 => Color::CYAN,
            Some(t) if t <= 75.0 => Color::GREEN,
            Some(t) if t <= 85.0 => Color::ORANGE,
            Some(_) => Color::RED,
        }
    }

    pub fn wind_text(&self) -> String {
        match (self.wind_mph, self.wind_degree) {
            (Some(mph), _) if mph < CALM_BELOW_MPH => "CALM".to_string(),
            (Some(mph), Some(deg)) => format!("{} {:.0}MPH", compass_point(deg), mph),
            (Some(mph), None) => format!("{:.0}MPH", mph),
            (None, _) => String::new(),
        }
    }
}

pub fn compass_point(degrees: f64) -> &'static str {
    let sector = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_points_wrap_around_north() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(247.5), "WSW");
        assert_eq!(compass_point(90.0), "E");
    }

    #[test]
    fn full_report_formats() {
        let report = WeatherReport {
            temp_f: Some(71.6),
            wind_mph: Some(12.2),
            wind_degree: Some(250.0),
        };
        assert_eq!(report.temp_text(), "72F");
        assert_eq!(report.temp_color(), Color::GREEN);
        assert_eq!(report.wind_text(), "WSW 12MPH");
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let report = WeatherReport::default();
        assert_eq!(report.temp_text(), "--F");
        assert_eq!(report.temp_color(), Color::WHITE);
        assert_eq!(report.wind_text(), "");
    }

    #[test]
    fn light_wind_is_calm() {
        let report = WeatherReport {
            wind_mph: Some(0.4),
            wind_degree: Some(10.0),
            ..Default::default()
        };
        assert_eq!(report.wind_text(), "CALM");
    }

    #[test]
    fn temperature_bands() {
        let color = |t| WeatherReport { temp_f: Some(t), ..Default::default() }.temp_color();
        assert_eq!(color(40.0), Color::BLUE);
        assert_eq!(color(55.0), Color::CYAN);
        assert_eq!(color(80.0), Color::ORANGE);
        assert_eq!(color(95.0), Color::RED);
    }
}
