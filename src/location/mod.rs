// src/location/mod.rs - Single-shot geolocation over an injected platform source
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::errors::{FacilityError, FacilityResult};
use crate::models::Coordinate;
use crate::utils::constants::{
    DEFAULT_HIGH_ACCURACY, DEFAULT_LOCATION_MAX_AGE_MS, DEFAULT_LOCATION_TIMEOUT_MS,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Upper bound on how long the platform may take to answer.
    pub timeout: Duration,
    /// A previous reading younger than this is returned as-is.
    pub maximum_age: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_LOCATION_TIMEOUT_MS),
            maximum_age: Duration::from_millis(DEFAULT_LOCATION_MAX_AGE_MS),
            high_accuracy: DEFAULT_HIGH_ACCURACY,
        }
    }
}

/// Platform capability that can answer "where am I" once per call.
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    /// Raw platform reading in degrees. Errors cover permission denial and
    /// any platform failure; the provider turns them into `LocationUnavailable`.
    async fn current_position(&self, options: &PositionOptions) -> Result<(f64, f64)>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReading {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

/// Always answers with the same coordinate, e.g. a location given on the command line.
#[derive(Debug, Clone)]
pub struct FixedLocationSource {
    coordinate: Coordinate,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl GeolocationSource for FixedLocationSource {
    async fn current_position(&self, _options: &PositionOptions) -> Result<(f64, f64)> {
        Ok((self.coordinate.latitude(), self.coordinate.longitude()))
    }
}

pub struct LocationProvider {
    source: Option<Arc<dyn GeolocationSource>>,
    last_reading: Mutex<Option<PositionReading>>,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn GeolocationSource>) -> Self {
        Self {
            source: Some(source),
            last_reading: Mutex::new(None),
        }
    }

    /// A provider for environments without any geolocation capability.
    pub fn unsupported() -> Self {
        Self {
            source: None,
            last_reading: Mutex::new(None),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.source.as_ref().map_or(false, |s| s.is_supported())
    }

    pub async fn last_reading(&self) -> Option<PositionReading> {
        *self.last_reading.lock().await
    }

    /// Reads the current position once. No retries; the caller decides.
    pub async fn get_current_location(
        &self,
        options: PositionOptions,
    ) -> FacilityResult<Coordinate> {
        let source = match &self.source {
            Some(source) if source.is_supported() => source,
            _ => return Err(FacilityError::GeolocationUnsupported),
        };

        if let Some(cached) = self.fresh_reading(options.maximum_age).await {
            debug!("Reusing cached position {} from {}", cached.coordinate, cached.timestamp);
            return Ok(cached.coordinate);
        }

        let request = source.current_position(&options);
        let (latitude, longitude) = match tokio::time::timeout(options.timeout, request).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!("Geolocation source failed: {:?}", e);
                return Err(FacilityError::LocationUnavailable(e.to_string()));
            }
            Err(_) => {
                warn!("Geolocation timed out after {:?}", options.timeout);
                return Err(FacilityError::LocationUnavailable(format!(
                    "timed out after {} ms",
                    options.timeout.as_millis()
                )));
            }
        };

        let coordinate = Coordinate::new(latitude, longitude).map_err(|e| {
            FacilityError::LocationUnavailable(format!("platform returned {}", e))
        })?;

        *self.last_reading.lock().await = Some(PositionReading {
            coordinate,
            timestamp: Utc::now(),
        });

        Ok(coordinate)
    }

    async fn fresh_reading(&self, maximum_age: Duration) -> Option<PositionReading> {
        if maximum_age.is_zero() {
            return None;
        }
        let max_age = chrono::Duration::from_std(maximum_age).ok()?;
        let reading = (*self.last_reading.lock().await)?;
        if Utc::now().signed_duration_since(reading.timestamp) <= max_age {
            Some(reading)
        } else {
            None
        }
    }
}
