// src/utils/logging.rs - Logging helpers for facility map sessions
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

use crate::models::{Coordinate, FacilityCategory, RankedFacility};

#[derive(Clone)]
pub struct SessionLogger {
    tag: String,
    emoji: &'static str,
    session_id: Uuid,
    start_time: Instant,
}

impl SessionLogger {
    pub fn new(category: &FacilityCategory, session_id: Uuid) -> Self {
        Self {
            tag: category.as_str().to_uppercase().replace(' ', "_"),
            emoji: category.icon(),
            session_id,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self) {
        info!(
            "[{}] {} 🚀 Opening facility map (session {})",
            self.tag, self.emoji, self.session_id
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.tag, self.emoji, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.tag, self.emoji, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_location(&self, reference: &Coordinate) {
        info!(
            "[{}] {} 📍 Reference location: {}",
            self.tag, self.emoji, reference
        );
    }

    pub fn log_ready(&self, ranked: &[RankedFacility]) {
        let closest: Vec<&str> = ranked
            .iter()
            .filter(|r| r.is_closest)
            .map(|r| r.facility.name.as_str())
            .collect();
        let nearest = ranked.first().map(|r| r.distance_miles).unwrap_or(0.0);
        info!(
            "[{}] {} ✅ {} markers ready in {:.2?}, nearest {:.1} mi, closest: {:?}",
            self.tag,
            self.emoji,
            ranked.len(),
            self.start_time.elapsed(),
            nearest,
            closest
        );
    }

    pub fn log_stale_result(&self) {
        info!(
            "[{}] {} ⏭️  Location arrived after session {} was closed, discarding",
            self.tag, self.emoji, self.session_id
        );
    }

    pub fn log_cancelled(&self) {
        info!(
            "[{}] {} 🛑 Location request cancelled, session {} was closed",
            self.tag, self.emoji, self.session_id
        );
    }

    pub fn log_failure(&self, reason: &str) {
        warn!(
            "[{}] {} ❌ Location lookup failed after {:.2?}: {}",
            self.tag,
            self.emoji,
            self.start_time.elapsed(),
            reason
        );
    }
}
