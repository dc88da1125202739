pub mod errors;
pub mod location;
pub mod map;
pub mod models;
pub mod proximity;
pub mod utils;

pub use errors::{FacilityError, FacilityResult};
pub use models::{Coordinate, Facility, FacilityCategory, RankedFacility};
