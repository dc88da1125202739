// src/proximity/ranking.rs
use super::distance::distance_miles;
use crate::models::{Coordinate, Facility, RankedFacility};

/// Orders facilities nearest-first and flags the first `closest_count`.
///
/// The sort is stable, so equidistant facilities keep their input order.
/// The input slice is left untouched.
pub fn rank(
    reference: &Coordinate,
    facilities: &[Facility],
    closest_count: usize,
) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = facilities
        .iter()
        .map(|facility| RankedFacility {
            distance_miles: distance_miles(reference, &facility.location),
            facility: facility.clone(),
            is_closest: false,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

    for entry in ranked.iter_mut().take(closest_count) {
        entry.is_closest = true;
    }

    ranked
}
