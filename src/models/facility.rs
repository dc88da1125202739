// src/models/facility.rs
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::coordinate::Coordinate;
use crate::proximity::distance::{driving_minutes, walking_minutes};

/// Kind of service a facility offers. Any label outside the known set is kept
/// verbatim in `Other` so callers never have to handle a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacilityCategory {
    HomelessShelter,
    Rehabilitation,
    Education,
    Other(String),
}

const HOMELESS_SHELTER_NAMES: [&str; 5] = [
    "Emergency Shelter",
    "Family Housing Center",
    "Safe Haven",
    "Community Shelter",
    "Transitional Housing",
];
const HOMELESS_SHELTER_DESCRIPTIONS: [&str; 5] = [
    "24/7 emergency housing",
    "Family-focused shelter",
    "Safe housing for all",
    "Temporary accommodation",
    "Supportive housing",
];
const REHABILITATION_NAMES: [&str; 5] = [
    "Recovery Center",
    "Treatment Facility",
    "Wellness Center",
    "Support Center",
    "Healing Hub",
];
const REHABILITATION_DESCRIPTIONS: [&str; 5] = [
    "Comprehensive treatment",
    "Recovery programs",
    "Mental health support",
    "Addiction services",
    "Holistic healing",
];
const EDUCATION_NAMES: [&str; 5] = [
    "Learning Center",
    "Skills Academy",
    "Training Institute",
    "Education Hub",
    "Development Center",
];
const EDUCATION_DESCRIPTIONS: [&str; 5] = [
    "Job training programs",
    "Adult education",
    "Skill development",
    "Career coaching",
    "Life skills training",
];

impl FacilityCategory {
    pub fn known() -> [FacilityCategory; 3] {
        [
            FacilityCategory::HomelessShelter,
            FacilityCategory::Rehabilitation,
            FacilityCategory::Education,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            FacilityCategory::HomelessShelter => "Homeless Shelter",
            FacilityCategory::Rehabilitation => "Rehabilitation",
            FacilityCategory::Education => "Education",
            FacilityCategory::Other(label) => label,
        }
    }

    pub fn name_pool(&self) -> &'static [&'static str] {
        match self {
            FacilityCategory::HomelessShelter => &HOMELESS_SHELTER_NAMES,
            FacilityCategory::Rehabilitation => &REHABILITATION_NAMES,
            FacilityCategory::Education => &EDUCATION_NAMES,
            FacilityCategory::Other(_) => &[],
        }
    }

    pub fn description_pool(&self) -> &'static [&'static str] {
        match self {
            FacilityCategory::HomelessShelter => &HOMELESS_SHELTER_DESCRIPTIONS,
            FacilityCategory::Rehabilitation => &REHABILITATION_DESCRIPTIONS,
            FacilityCategory::Education => &EDUCATION_DESCRIPTIONS,
            FacilityCategory::Other(_) => &[],
        }
    }

    /// Marker fill color used by the map presenter.
    pub fn marker_color(&self) -> &'static str {
        match self {
            FacilityCategory::HomelessShelter => "#3b82f6",
            FacilityCategory::Rehabilitation => "#10b981",
            FacilityCategory::Education => "#8b5cf6",
            FacilityCategory::Other(_) => "#ef4444",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FacilityCategory::HomelessShelter => "🏠",
            FacilityCategory::Rehabilitation => "🏥",
            FacilityCategory::Education => "📚",
            FacilityCategory::Other(_) => "📍",
        }
    }
}

/// Exact label lookup; any other string, including differently cased or
/// padded labels, becomes `Other`.
impl From<&str> for FacilityCategory {
    fn from(label: &str) -> Self {
        match label {
            "Homeless Shelter" => FacilityCategory::HomelessShelter,
            "Rehabilitation" => FacilityCategory::Rehabilitation,
            "Education" => FacilityCategory::Education,
            other => FacilityCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for FacilityCategory {
    fn from(label: String) -> Self {
        FacilityCategory::from(label.as_str())
    }
}

impl From<FacilityCategory> for String {
    fn from(category: FacilityCategory) -> Self {
        category.as_str().to_string()
    }
}

impl FromStr for FacilityCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FacilityCategory::from(s))
    }
}

impl fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: u32,
    pub name: String,
    pub category: FacilityCategory,
    pub location: Coordinate,
    pub description: String,
}

/// A facility annotated with its distance from the session's reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    pub distance_miles: f64,
    pub is_closest: bool,
}

impl RankedFacility {
    pub fn id(&self) -> u32 {
        self.facility.id
    }

    pub fn driving_minutes(&self) -> u32 {
        driving_minutes(self.distance_miles)
    }

    pub fn walking_minutes(&self) -> u32 {
        walking_minutes(self.distance_miles)
    }
}
