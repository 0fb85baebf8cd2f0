use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        GeoPoint {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

/// Approach lane: a segment between two points widened by a lateral
/// tolerance, plus the altitude window aircraft must be in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorridorSpec {
    pub p1: GeoPoint,
    pub p2: GeoPoint,
    pub half_width_m: f64,
    pub altitude_min_ft: f64,
    pub altitude_max_ft: f64,
    #[serde(default = "default_require_altitude")]
    pub require_altitude: bool,
}

fn default_require_altitude() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lon >= self.west
            && point.lon <= self.east
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub distance_m: f64,
    /// Projection parameter clamped to the segment, 0 at `a` and 1 at `b`.
    pub t: f64,
    /// Same parameter before clamping.
    pub along: f64,
}
