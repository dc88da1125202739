// src/models/coordinate.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{FacilityError, FacilityResult};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated point in degrees. Only constructible through [`Coordinate::new`],
/// so every value in circulation is inside the legal latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = FacilityError;

    fn try_from(raw: RawCoordinate) -> FacilityResult<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> FacilityResult<Self> {
        let latitude_ok = latitude.is_finite() && (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude);
        let longitude_ok =
            longitude.is_finite() && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude);

        if !latitude_ok || !longitude_ok {
            return Err(FacilityError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    /// Applies a degree offset, clamping latitude at the poles and wrapping
    /// longitude across the antimeridian so the result stays valid.
    pub fn offset_by(&self, delta_latitude: f64, delta_longitude: f64) -> Self {
        let latitude = (self.latitude + delta_latitude).clamp(MIN_LATITUDE, MAX_LATITUDE);
        let mut longitude = self.longitude + delta_longitude;
        if longitude > MAX_LONGITUDE {
            longitude -= 360.0;
        } else if longitude < MIN_LONGITUDE {
            longitude += 360.0;
        }
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
