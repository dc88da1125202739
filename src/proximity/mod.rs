// src/proximity/mod.rs - Distance math, synthetic facility generation and ranking
pub mod distance;
pub mod generator;
pub mod ranking;

pub use distance::{distance_miles, distance_miles_between, driving_minutes, walking_minutes};
pub use generator::FacilityGenerator;
pub use ranking::rank;
