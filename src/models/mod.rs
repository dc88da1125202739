pub mod coordinate;
pub mod facility;

pub use coordinate::Coordinate;
pub use facility::{Facility, FacilityCategory, RankedFacility};
