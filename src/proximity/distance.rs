// src/proximity/distance.rs
use crate::errors::FacilityResult;
use crate::models::Coordinate;
use crate::utils::constants::{
    DRIVING_MINUTES_PER_MILE, EARTH_RADIUS_MILES, WALKING_MINUTES_PER_MILE,
};

/// Great-circle distance in miles (haversine).
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude(), a.longitude());
    let (lat2, lon2) = (b.latitude(), b.longitude());
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let (delta_phi, delta_lambda) = ((lat2 - lat1).to_radians(), (lon2 - lon1).to_radians());
    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Same as [`distance_miles`] for raw degree values; rejects anything that is
/// not a valid coordinate.
pub fn distance_miles_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> FacilityResult<f64> {
    let a = Coordinate::new(lat1, lng1)?;
    let b = Coordinate::new(lat2, lng2)?;
    Ok(distance_miles(&a, &b))
}

pub fn driving_minutes(distance_miles: f64) -> u32 {
    minutes_at(distance_miles, DRIVING_MINUTES_PER_MILE)
}

pub fn walking_minutes(distance_miles: f64) -> u32 {
    minutes_at(distance_miles, WALKING_MINUTES_PER_MILE)
}

fn minutes_at(distance_miles: f64, minutes_per_mile: f64) -> u32 {
    // f64::max drops NaN, so garbage distances read as zero.
    (distance_miles.max(0.0) * minutes_per_mile).ceil() as u32
}
