use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geometry::GeoPoint;

/// One aircraft sample from a flight feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude_ft: Option<f64>,
    /// Feed-specific aircraft key (ICAO hex or the feed's flight id).
    pub identifier: String,
    #[serde(default)]
    pub callsign: String,
    #[serde(default)]
    pub source_id: String,
}

impl Observation {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AircraftDetails {
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub aircraft_type: Option<String>,
    #[serde(default)]
    pub origin_airport_code: Option<String>,
}
