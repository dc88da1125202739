// src/map/view.rs
use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// `{z}/{x}/{y}` style template understood by the map library.
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// What the presenter needs to create the map for a ready session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_layer: TileLayer,
}
