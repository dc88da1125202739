// src/map/presenter.rs
use log::{debug, info, warn};
use std::sync::Mutex;

use super::popup::MarkerData;
use super::view::MapView;
use crate::models::{Coordinate, RankedFacility};

/// Rendering side of a map session. The controller only hands over data;
/// how a map, marker or popup is drawn is entirely up to the implementation.
pub trait MapPresenter: Send + Sync {
    fn create_map(&self, view: &MapView);

    fn add_user_marker(&self, location: &Coordinate);

    /// Called once per ranked facility, nearest first.
    fn add_facility_marker(&self, marker: &MarkerData);

    fn facility_selected(&self, facility: &RankedFacility);

    /// Human-readable failure reason; `retryable` tells the view whether a
    /// retry control makes sense.
    fn location_error(&self, message: &str, retryable: bool);

    fn clear_map(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    MapCreated(MapView),
    UserMarker(Coordinate),
    FacilityMarker(MarkerData),
    FacilitySelected(RankedFacility),
    LocationError { message: String, retryable: bool },
    Cleared,
}

/// Presenter that logs every call and keeps the event history, used by the
/// command line front end and as a test double.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn markers(&self) -> Vec<MarkerData> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::FacilityMarker(marker) => Some(marker),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: PresenterEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(_) => warn!("Presenter event log poisoned, dropping {:?}", event),
        }
    }
}

impl MapPresenter for RecordingPresenter {
    fn create_map(&self, view: &MapView) {
        debug!("Map centered at {} (zoom {})", view.center, view.zoom);
        self.record(PresenterEvent::MapCreated(view.clone()));
    }

    fn add_user_marker(&self, location: &Coordinate) {
        debug!("Your Location marker at {}", location);
        self.record(PresenterEvent::UserMarker(*location));
    }

    fn add_facility_marker(&self, marker: &MarkerData) {
        debug!(
            "{} {} marker #{} '{}' {} ({} min drive, {} min walk)",
            marker.style.icon,
            if marker.is_closest { "closest" } else { "nearby" },
            marker.facility_id,
            marker.popup.name,
            marker.popup.distance_label,
            marker.popup.driving_minutes,
            marker.popup.walking_minutes
        );
        self.record(PresenterEvent::FacilityMarker(marker.clone()));
    }

    fn facility_selected(&self, facility: &RankedFacility) {
        info!(
            "Selected '{}' ({:.1} mi away)",
            facility.facility.name, facility.distance_miles
        );
        self.record(PresenterEvent::FacilitySelected(facility.clone()));
    }

    fn location_error(&self, message: &str, retryable: bool) {
        warn!("Location error: {} (retryable: {})", message, retryable);
        self.record(PresenterEvent::LocationError {
            message: message.to_string(),
            retryable,
        });
    }

    fn clear_map(&self) {
        debug!("Map cleared");
        self.record(PresenterEvent::Cleared);
    }
}
