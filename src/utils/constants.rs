// src/utils/constants.rs

/// Mean Earth radius in miles used by the haversine distance.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Rough urban travel pace used for the popup estimates.
pub const DRIVING_MINUTES_PER_MILE: f64 = 3.0;
pub const WALKING_MINUTES_PER_MILE: f64 = 20.0;

/// Facilities generated per map session.
pub const DEFAULT_FACILITY_COUNT: usize = 5;
/// How many of the nearest facilities are highlighted.
pub const DEFAULT_CLOSEST_COUNT: usize = 2;
/// Per-axis spread of generated facilities, roughly 2 miles at mid latitudes.
pub const DEFAULT_MAX_OFFSET_DEGREES: f64 = 0.02;

pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOCATION_MAX_AGE_MS: u64 = 300_000; // 5 minutes
pub const DEFAULT_HIGH_ACCURACY: bool = true;

pub const DEFAULT_MAP_ZOOM: u8 = 15;
pub const DEFAULT_MAP_MAX_ZOOM: u8 = 18;
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

pub const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";
