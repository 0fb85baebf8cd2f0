use crate::geometry::{altitude_ok, distance_to_segment_m, within_corridor, CorridorSpec};

use super::types::Observation;

/// Nearest in-corridor, in-altitude observation to the corridor centerline.
/// On equal distances the earlier observation wins.
pub fn pick_best<'a>(observations: &'a [Observation], spec: &CorridorSpec) -> Option<&'a Observation> {
    observations
        .iter()
        .filter(|obs| altitude_ok(obs.altitude_ft, spec))
        .filter(|obs| within_corridor(&obs.position(), spec))
        .map(|obs| {
            let projection = distance_to_segment_m(&obs.position(), &spec.p1, &spec.p2);
            (obs, projection.distance_m)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(obs, _)| obs)
}
