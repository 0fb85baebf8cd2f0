use super::types::{BoundingBox, CorridorSpec, GeoPoint, SegmentProjection};

pub const METERS_PER_DEGREE: f64 = 111_320.0;
pub const METERS_PER_MILE: f64 = 1_609.344;
pub const MILES_PER_DEGREE: f64 = 69.0;
pub const QUERY_PADDING_MILES: f64 = 0.1;

const MIN_LON_SCALE: f64 = 0.1;
const DEGENERATE_SEGMENT_M2: f64 = 1e-6;

/// Query region for the flight feed. Not used for containment.
pub fn corridor_bounding_box(spec: &CorridorSpec) -> BoundingBox {
    let pad_miles = spec.half_width_m / METERS_PER_MILE + QUERY_PADDING_MILES;
    let mid_lat = spec.p1.midpoint(&spec.p2).lat;

    let pad_lat = pad_miles / MILES_PER_DEGREE;
    // floor keeps the longitude padding finite close to the poles
    let pad_lon = pad_miles / (MILES_PER_DEGREE * mid_lat.to_radians().cos().max(MIN_LON_SCALE));

    BoundingBox {
        north: spec.p1.lat.max(spec.p2.lat) + pad_lat,
        south: spec.p1.lat.min(spec.p2.lat) - pad_lat,
        west: spec.p1.lon.min(spec.p2.lon) - pad_lon,
        east: spec.p1.lon.max(spec.p2.lon) + pad_lon,
    }
}

/// Local equirectangular projection around `lat0`. Only meaningful over a
/// few tens of kilometers.
pub fn project_to_local_m(point: &GeoPoint, lat0: f64) -> (f64, f64) {
    let x = point.lon * METERS_PER_DEGREE * lat0.to_radians().cos();
    let y = point.lat * METERS_PER_DEGREE;
    (x, y)
}

pub fn distance_to_segment_m(point: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> SegmentProjection {
    let lat0 = a.midpoint(b).lat;
    let (px, py) = project_to_local_m(point, lat0);
    let (ax, ay) = project_to_local_m(a, lat0);
    let (bx, by) = project_to_local_m(b, lat0);

    let dx = bx - ax;
    let dy = by - ay;
    let len2 = dx * dx + dy * dy;

    if len2 <= DEGENERATE_SEGMENT_M2 {
        return SegmentProjection {
            distance_m: (px - ax).hypot(py - ay),
            t: 0.0,
            along: 0.0,
        };
    }

    let along = ((px - ax) * dx + (py - ay) * dy) / len2;
    let t = along.clamp(0.0, 1.0);
    let cx = ax + t * dx;
    let cy = ay + t * dy;

    SegmentProjection {
        distance_m: (px - cx).hypot(py - cy),
        t,
        along,
    }
}

/// The corridor is a lane segment, not an infinite strip: anything projecting
/// before `p1` or past `p2` is outside however close it is laterally.
pub fn within_corridor(point: &GeoPoint, spec: &CorridorSpec) -> bool {
    let projection = distance_to_segment_m(point, &spec.p1, &spec.p2);
    (0.0..=1.0).contains(&projection.along) && projection.distance_m <= spec.half_width_m
}

pub fn altitude_ok(altitude_ft: Option<f64>, spec: &CorridorSpec) -> bool {
    match altitude_ft {
        None => !spec.require_altitude,
        Some(alt) => alt >= spec.altitude_min_ft && alt <= spec.altitude_max_ft,
    }
}
