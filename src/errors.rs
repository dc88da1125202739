// src/errors.rs
use thiserror::Error;

pub type FacilityResult<T> = Result<T, FacilityError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacilityError {
    #[error("Invalid coordinate: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Geolocation is not supported by this environment")]
    GeolocationUnsupported,

    #[error("Unable to retrieve your location: {0}")]
    LocationUnavailable(String),
}

impl FacilityError {
    /// Only location lookups that failed at runtime are worth offering a retry for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FacilityError::LocationUnavailable(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FacilityError::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            FacilityError::GeolocationUnsupported => "GEOLOCATION_UNSUPPORTED",
            FacilityError::LocationUnavailable(_) => "LOCATION_UNAVAILABLE",
        }
    }
}
