// src/utils/map_config.rs

use log::{debug, info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::location::PositionOptions;
use crate::map::view::{MapView, TileLayer};
use crate::models::Coordinate;
use crate::utils::constants::*;

/// Tunables for a facility map session
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Facilities generated per session
    pub facility_count: usize,
    /// Number of nearest facilities flagged as closest
    pub closest_count: usize,
    /// Per-axis offset bound for generated facilities, in degrees
    pub max_offset_degrees: f64,
    /// Fixed RNG seed for reproducible batches
    pub seed: Option<u64>,
    pub location_timeout_ms: u64,
    pub location_max_age_ms: u64,
    pub high_accuracy: bool,
    pub map_zoom: u8,
    pub map_max_zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            facility_count: DEFAULT_FACILITY_COUNT,
            closest_count: DEFAULT_CLOSEST_COUNT,
            max_offset_degrees: DEFAULT_MAX_OFFSET_DEGREES,
            seed: None,
            location_timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            location_max_age_ms: DEFAULT_LOCATION_MAX_AGE_MS,
            high_accuracy: DEFAULT_HIGH_ACCURACY,
            map_zoom: DEFAULT_MAP_ZOOM,
            map_max_zoom: DEFAULT_MAP_MAX_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable value for {}: '{}'", key, raw);
            None
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env_parse(key).unwrap_or(default)
}

impl MapConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            facility_count: env_or("FACILITY_COUNT", defaults.facility_count),
            closest_count: env_or("FACILITY_CLOSEST_COUNT", defaults.closest_count),
            max_offset_degrees: env_or("FACILITY_MAX_OFFSET_DEGREES", defaults.max_offset_degrees),
            seed: env_parse("FACILITY_SEED"),
            location_timeout_ms: env_or("LOCATION_TIMEOUT_MS", defaults.location_timeout_ms),
            location_max_age_ms: env_or("LOCATION_MAX_AGE_MS", defaults.location_max_age_ms),
            high_accuracy: env_or("LOCATION_HIGH_ACCURACY", defaults.high_accuracy),
            map_zoom: env_or("MAP_ZOOM", defaults.map_zoom),
            map_max_zoom: env_or("MAP_MAX_ZOOM", defaults.map_max_zoom),
            tile_url: env::var("MAP_TILE_URL").unwrap_or(defaults.tile_url),
            tile_attribution: env::var("MAP_TILE_ATTRIBUTION").unwrap_or(defaults.tile_attribution),
        }
        .sanitized();

        debug!("Map config from env: {:?}", config);
        config
    }

    /// Pulls values that would break generation back to safe defaults.
    pub fn sanitized(mut self) -> Self {
        if self.facility_count == 0 {
            self.facility_count = DEFAULT_FACILITY_COUNT;
        }
        if !(self.max_offset_degrees.is_finite() && self.max_offset_degrees > 0.0) {
            self.max_offset_degrees = DEFAULT_MAX_OFFSET_DEGREES;
        }
        if self.map_zoom > self.map_max_zoom {
            self.map_zoom = self.map_max_zoom;
        }
        self
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_millis(self.location_timeout_ms),
            maximum_age: Duration::from_millis(self.location_max_age_ms),
            high_accuracy: self.high_accuracy,
        }
    }

    pub fn map_view(&self, center: Coordinate) -> MapView {
        MapView {
            center,
            zoom: self.map_zoom,
            tile_layer: TileLayer {
                url_template: self.tile_url.clone(),
                attribution: self.tile_attribution.clone(),
                max_zoom: self.map_max_zoom,
            },
        }
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("🗺️  Facility map configuration");
        info!(
            "   {} facilities per session, {} highlighted as closest, spread ±{}°",
            self.facility_count, self.closest_count, self.max_offset_degrees
        );
        info!(
            "   Location: timeout={}ms, max age={}ms, high accuracy={}",
            self.location_timeout_ms, self.location_max_age_ms, self.high_accuracy
        );
        match self.seed {
            Some(seed) => info!("   Deterministic generation with seed {}", seed),
            None => info!("   Randomized generation (no seed)"),
        }
    }
}

/// Environment variable configuration example
pub fn print_env_config_example() {
    println!("# Facility Map Configuration");
    println!();
    println!("# Facilities generated per session (default: {})", DEFAULT_FACILITY_COUNT);
    println!("export FACILITY_COUNT={}", DEFAULT_FACILITY_COUNT);
    println!("# Nearest facilities highlighted (default: {})", DEFAULT_CLOSEST_COUNT);
    println!("export FACILITY_CLOSEST_COUNT={}", DEFAULT_CLOSEST_COUNT);
    println!("# Per-axis spread in degrees (default: {})", DEFAULT_MAX_OFFSET_DEGREES);
    println!("export FACILITY_MAX_OFFSET_DEGREES={}", DEFAULT_MAX_OFFSET_DEGREES);
    println!("# Optional seed for reproducible batches");
    println!("# export FACILITY_SEED=42");
    println!();
    println!("export LOCATION_TIMEOUT_MS={}", DEFAULT_LOCATION_TIMEOUT_MS);
    println!("export LOCATION_MAX_AGE_MS={}", DEFAULT_LOCATION_MAX_AGE_MS);
    println!("export LOCATION_HIGH_ACCURACY={}", DEFAULT_HIGH_ACCURACY);
    println!();
    println!("export MAP_ZOOM={}", DEFAULT_MAP_ZOOM);
    println!("export MAP_MAX_ZOOM={}", DEFAULT_MAP_MAX_ZOOM);
    println!("export MAP_TILE_URL='{}'", DEFAULT_TILE_URL);
    println!("export MAP_TILE_ATTRIBUTION='{}'", DEFAULT_TILE_ATTRIBUTION);
}
