// src/map/popup.rs - Marker and popup content, kept free of any markup
use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, FacilityCategory, RankedFacility};
use crate::utils::constants::DIRECTIONS_BASE_URL;

/// Link that opens turn-by-turn directions to `destination`.
pub fn directions_url(destination: &Coordinate) -> String {
    format!("{}{}", DIRECTIONS_BASE_URL, destination)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub icon: String,
    /// Set for the facilities flagged as closest.
    pub highlighted: bool,
}

impl MarkerStyle {
    pub fn for_facility(category: &FacilityCategory, is_closest: bool) -> Self {
        Self {
            color: category.marker_color().to_string(),
            icon: category.icon().to_string(),
            highlighted: is_closest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub name: String,
    pub category: FacilityCategory,
    pub description: String,
    pub distance_miles: f64,
    pub distance_label: String,
    pub driving_minutes: u32,
    pub walking_minutes: u32,
    pub directions_url: String,
}

impl From<&RankedFacility> for PopupContent {
    fn from(ranked: &RankedFacility) -> Self {
        let facility = &ranked.facility;
        Self {
            name: facility.name.clone(),
            category: facility.category.clone(),
            description: facility.description.clone(),
            distance_miles: ranked.distance_miles,
            distance_label: format!("{:.1} mi", ranked.distance_miles),
            driving_minutes: ranked.driving_minutes(),
            walking_minutes: ranked.walking_minutes(),
            directions_url: directions_url(&facility.location),
        }
    }
}

/// Everything the presenter needs to place one facility marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    pub facility_id: u32,
    pub location: Coordinate,
    pub is_closest: bool,
    pub style: MarkerStyle,
    pub popup: PopupContent,
}

impl From<&RankedFacility> for MarkerData {
    fn from(ranked: &RankedFacility) -> Self {
        Self {
            facility_id: ranked.id(),
            location: ranked.facility.location,
            is_closest: ranked.is_closest,
            style: MarkerStyle::for_facility(&ranked.facility.category, ranked.is_closest),
            popup: PopupContent::from(ranked),
        }
    }
}
