// src/proximity/generator.rs
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Coordinate, Facility, FacilityCategory};
use crate::utils::constants::DEFAULT_MAX_OFFSET_DEGREES;

/// Synthesizes a batch of plausible facilities around a reference point.
///
/// Offsets are drawn independently per axis from `[-max_offset, max_offset)`
/// degrees. Names and descriptions come from the category's pools by
/// position and fall back to generic labels once a pool runs out.
pub struct FacilityGenerator<R: Rng = StdRng> {
    rng: R,
    max_offset_degrees: f64,
}

impl FacilityGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when a seed is configured, entropy-backed otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> FacilityGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_offset_degrees: DEFAULT_MAX_OFFSET_DEGREES,
        }
    }

    /// Non-positive or non-finite values keep the current offset.
    pub fn with_max_offset(mut self, max_offset_degrees: f64) -> Self {
        if max_offset_degrees.is_finite() && max_offset_degrees > 0.0 {
            self.max_offset_degrees = max_offset_degrees;
        }
        self
    }

    pub fn max_offset_degrees(&self) -> f64 {
        self.max_offset_degrees
    }

    pub fn generate(
        &mut self,
        reference: &Coordinate,
        category: &FacilityCategory,
        count: usize,
    ) -> Vec<Facility> {
        let names = category.name_pool();
        let descriptions = category.description_pool();
        let spread = self.max_offset_degrees;

        let facilities: Vec<Facility> = (0..count)
            .map(|index| {
                let lat_offset = self.rng.gen_range(-spread..spread);
                let lng_offset = self.rng.gen_range(-spread..spread);

                let name = names
                    .get(index)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("{} {}", category, index + 1));
                let description = descriptions
                    .get(index)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| {
                        format!("Professional {} services", category.as_str().to_lowercase())
                    });

                Facility {
                    id: index as u32 + 1,
                    name,
                    category: category.clone(),
                    location: reference.offset_by(lat_offset, lng_offset),
                    description,
                }
            })
            .collect();

        debug!(
            "Generated {} '{}' facilities within {}° of {}",
            facilities.len(),
            category,
            spread,
            reference
        );

        facilities
    }
}
