// src/map/controller.rs - Facility map session state machine
use log::debug;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use uuid::Uuid;

use super::popup::MarkerData;
use super::presenter::MapPresenter;
use crate::errors::{FacilityError, FacilityResult};
use crate::location::LocationProvider;
use crate::models::{Coordinate, FacilityCategory, RankedFacility};
use crate::proximity::{rank, FacilityGenerator};
use crate::utils::logging::SessionLogger;
use crate::utils::map_config::MapConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Idle,
    Locating,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// Markers were handed to the presenter.
    Ready { session_id: Uuid, markers: usize },
    /// A location request is already in flight; nothing changed.
    AlreadyLocating,
    /// The session was closed or replaced before the location arrived.
    Discarded,
    /// Retry requested outside of the `Error` state.
    Ignored,
}

struct Session {
    state: MapState,
    session_id: Option<Uuid>,
    category: Option<FacilityCategory>,
    reference: Option<Coordinate>,
    facilities: Vec<RankedFacility>,
    last_error: Option<FacilityError>,
    generator: FacilityGenerator,
    /// Set while a location request is pending for this session.
    cancel: Option<oneshot::Sender<()>>,
}

impl Session {
    fn discard(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.state = MapState::Idle;
        self.session_id = None;
        self.reference = None;
        self.facilities.clear();
        self.last_error = None;
    }
}

/// Drives one facility map: location lookup, facility generation, ranking
/// and marker hand-off to the presenter.
///
/// Only one location request is in flight at a time. Closing while locating
/// cancels the pending request, and the next open waits on `request_slot`
/// until that request has been dropped. Every open gets a fresh session id;
/// a location that resolves after its session was closed or replaced is
/// dropped without touching the presenter.
pub struct FacilityMapController<P: MapPresenter> {
    provider: LocationProvider,
    presenter: Arc<P>,
    config: MapConfig,
    session: Mutex<Session>,
    request_slot: Mutex<()>,
}

impl<P: MapPresenter> FacilityMapController<P> {
    pub fn new(provider: LocationProvider, presenter: Arc<P>, config: MapConfig) -> Self {
        let generator = FacilityGenerator::from_seed_option(config.seed)
            .with_max_offset(config.max_offset_degrees);

        Self {
            provider,
            presenter,
            config,
            session: Mutex::new(Session {
                state: MapState::Idle,
                session_id: None,
                category: None,
                reference: None,
                facilities: Vec::new(),
                last_error: None,
                generator,
                cancel: None,
            }),
            request_slot: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> MapState {
        self.session.lock().await.state
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.session.lock().await.session_id
    }

    pub async fn reference(&self) -> Option<Coordinate> {
        self.session.lock().await.reference
    }

    pub async fn facilities(&self) -> Vec<RankedFacility> {
        self.session.lock().await.facilities.clone()
    }

    pub async fn last_error(&self) -> Option<FacilityError> {
        self.session.lock().await.last_error.clone()
    }

    /// Opens the map for `category`. A fresh session replaces any ready or
    /// failed one; an open while locating is a no-op.
    pub async fn open(&self, category: FacilityCategory) -> FacilityResult<OpenOutcome> {
        let (session_id, logger, cancelled) = {
            let mut session = self.session.lock().await;
            let current = session.state;
            match current {
                MapState::Locating => {
                    debug!("Open ignored, location request already in flight");
                    return Ok(OpenOutcome::AlreadyLocating);
                }
                MapState::Ready => {
                    session.discard();
                    self.presenter.clear_map();
                }
                MapState::Error => session.discard(),
                MapState::Idle => {}
            }

            let session_id = Uuid::new_v4();
            let (cancel, cancelled) = oneshot::channel();
            session.state = MapState::Locating;
            session.session_id = Some(session_id);
            session.category = Some(category.clone());
            session.cancel = Some(cancel);
            (session_id, SessionLogger::new(&category, session_id), cancelled)
        };

        logger.log_start();
        logger.log_phase("Locating", None);

        // The session lock is released while waiting on the platform. The
        // slot guard lives inside the request future, so a cancelled request
        // frees the slot as soon as it is dropped.
        let request = async {
            let _slot = self.request_slot.lock().await;
            self.provider
                .get_current_location(self.config.position_options())
                .await
        };
        let result = tokio::select! {
            result = request => result,
            _ = cancelled => {
                logger.log_cancelled();
                return Ok(OpenOutcome::Discarded);
            }
        };

        let mut session = self.session.lock().await;
        if session.session_id != Some(session_id) || session.state != MapState::Locating {
            logger.log_stale_result();
            return Ok(OpenOutcome::Discarded);
        }
        session.cancel = None;

        match result {
            Ok(reference) => {
                logger.log_location(&reference);
                let details = format!("{} facilities", self.config.facility_count);
                logger.log_phase("Generating", Some(details.as_str()));

                let batch = session
                    .generator
                    .generate(&reference, &category, self.config.facility_count);
                let ranked = rank(&reference, &batch, self.config.closest_count);

                self.presenter.create_map(&self.config.map_view(reference));
                self.presenter.add_user_marker(&reference);
                for facility in &ranked {
                    self.presenter.add_facility_marker(&MarkerData::from(facility));
                }
                logger.log_ready(&ranked);

                let markers = ranked.len();
                session.reference = Some(reference);
                session.facilities = ranked;
                session.state = MapState::Ready;
                Ok(OpenOutcome::Ready { session_id, markers })
            }
            Err(e) => {
                let message = e.to_string();
                logger.log_failure(&message);
                session.state = MapState::Error;
                session.last_error = Some(e.clone());
                self.presenter.location_error(&message, e.is_retryable());
                Err(e)
            }
        }
    }

    /// Re-runs the location lookup for the category that failed.
    pub async fn retry(&self) -> FacilityResult<OpenOutcome> {
        let category = {
            let session = self.session.lock().await;
            match (&session.state, &session.category) {
                (MapState::Error, Some(category)) => category.clone(),
                _ => return Ok(OpenOutcome::Ignored),
            }
        };
        self.open(category).await
    }

    /// Returns to `Idle`, dropping the batch. A pending location request for
    /// the closed session is cancelled.
    pub async fn close(&self) {
        let mut session = self.session.lock().await;
        let previous = session.state;
        session.discard();
        if previous == MapState::Ready {
            self.presenter.clear_map();
        }
        debug!("Facility map closed (was {:?})", previous);
    }

    /// Marker click: notifies the presenter and hands back the facility.
    pub async fn select_facility(&self, facility_id: u32) -> Option<RankedFacility> {
        let session = self.session.lock().await;
        if session.state != MapState::Ready {
            return None;
        }
        let selected = session
            .facilities
            .iter()
            .find(|f| f.id() == facility_id)
            .cloned()?;
        self.presenter.facility_selected(&selected);
        Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{FixedLocationSource, GeolocationSource, PositionOptions};
    use crate::map::presenter::{PresenterEvent, RecordingPresenter};
    use crate::proximity::{distance_miles, driving_minutes, walking_minutes};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Answers only once the test sends a reading through the channel.
    struct DeferredSource {
        receiver: Mutex<Option<oneshot::Receiver<(f64, f64)>>>,
    }

    impl DeferredSource {
        fn new() -> (oneshot::Sender<(f64, f64)>, Self) {
            let (tx, rx) = oneshot::channel();
            (tx, Self { receiver: Mutex::new(Some(rx)) })
        }
    }

    #[async_trait]
    impl GeolocationSource for DeferredSource {
        async fn current_position(&self, _options: &PositionOptions) -> Result<(f64, f64)> {
            let receiver = self
                .receiver
                .lock()
                .await
                .take()
                .ok_or_else(|| anyhow!("no reading scheduled"))?;
            receiver.await.map_err(|_| anyhow!("position request abandoned"))
        }
    }

    /// Fails the first `failures` calls, then answers.
    struct FlakySource {
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl GeolocationSource for FlakySource {
        async fn current_position(&self, _options: &PositionOptions) -> Result<(f64, f64)> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(anyhow!("User denied Geolocation"))
            } else {
                Ok((40.7580, -73.9855))
            }
        }
    }

    /// Answers after `delay`, tracking how many requests overlap.
    struct SlowSource {
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowSource {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    struct ActiveRequest<'a>(&'a AtomicUsize);

    impl Drop for ActiveRequest<'_> {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl GeolocationSource for SlowSource {
        async fn current_position(&self, _options: &PositionOptions) -> Result<(f64, f64)> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let _active = ActiveRequest(&self.active);
            tokio::time::sleep(self.delay).await;
            Ok((40.7580, -73.9855))
        }
    }

    fn times_square() -> Coordinate {
        Coordinate::new(40.7580, -73.9855).unwrap()
    }

    fn seeded_config() -> MapConfig {
        MapConfig {
            seed: Some(42),
            ..MapConfig::default()
        }
    }

    fn controller_with(
        source: Arc<dyn GeolocationSource>,
    ) -> (Arc<FacilityMapController<RecordingPresenter>>, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::new());
        let controller = FacilityMapController::new(
            LocationProvider::new(source),
            presenter.clone(),
            seeded_config(),
        );
        (Arc::new(controller), presenter)
    }

    async fn wait_for_state(
        controller: &FacilityMapController<RecordingPresenter>,
        state: MapState,
    ) {
        while controller.state().await != state {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_end_to_end_education_session() {
        let (tx, source) = DeferredSource::new();
        let (controller, presenter) = controller_with(Arc::new(source));
        assert_eq!(controller.state().await, MapState::Idle);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.open(FacilityCategory::Education).await }
        });
        wait_for_state(&controller, MapState::Locating).await;

        tx.send((40.7580, -73.9855)).unwrap();
        let outcome = task.await.unwrap().unwrap();

        assert!(matches!(outcome, OpenOutcome::Ready { markers: 5, .. }));
        assert_eq!(controller.state().await, MapState::Ready);
        assert_eq!(controller.reference().await, Some(times_square()));

        let events = presenter.events();
        assert!(matches!(events[0], PresenterEvent::MapCreated(_)));
        assert_eq!(events[1], PresenterEvent::UserMarker(times_square()));

        let markers = presenter.markers();
        assert_eq!(markers.len(), 5);
        assert_eq!(markers.iter().filter(|m| m.is_closest).count(), 2);
        assert!(markers[0].is_closest && markers[1].is_closest);

        for marker in &markers {
            let distance = distance_miles(&times_square(), &marker.location);
            assert!((marker.popup.distance_miles - distance).abs() < 1e-12);
            assert_eq!(marker.popup.driving_minutes, (distance * 3.0).ceil() as u32);
            assert_eq!(marker.popup.walking_minutes, (distance * 20.0).ceil() as u32);
            assert_eq!(marker.popup.driving_minutes, driving_minutes(distance));
            assert_eq!(marker.popup.walking_minutes, walking_minutes(distance));
            assert_eq!(marker.popup.category, FacilityCategory::Education);
        }
        for pair in markers.windows(2) {
            assert!(pair[0].popup.distance_miles <= pair[1].popup.distance_miles);
        }
    }

    #[tokio::test]
    async fn test_close_while_locating_discards_late_result() {
        let (tx, source) = DeferredSource::new();
        let (controller, presenter) = controller_with(Arc::new(source));

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.open(FacilityCategory::HomelessShelter).await }
        });
        wait_for_state(&controller, MapState::Locating).await;

        controller.close().await;
        assert_eq!(controller.state().await, MapState::Idle);

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, OpenOutcome::Discarded);

        // The pending platform request was dropped along with its channel.
        assert!(tx.send((40.7580, -73.9855)).is_err());
        assert_eq!(controller.state().await, MapState::Idle);
        assert!(presenter.markers().is_empty());
        assert!(presenter.events().is_empty());
        assert!(controller.facilities().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_then_reopen_keeps_single_request() {
        let source = Arc::new(SlowSource::new(Duration::from_millis(200)));
        let (controller, presenter) = controller_with(source.clone());

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.open(FacilityCategory::Education).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.state().await, MapState::Locating);

        controller.close().await;
        let second = controller.open(FacilityCategory::Education).await.unwrap();

        assert_eq!(first.await.unwrap().unwrap(), OpenOutcome::Discarded);
        assert!(matches!(second, OpenOutcome::Ready { markers: 5, .. }));
        assert_eq!(source.peak.load(Ordering::SeqCst), 1);
        assert_eq!(source.active.load(Ordering::SeqCst), 0);
        assert_eq!(presenter.markers().len(), 5);
        assert!(!presenter.events().contains(&PresenterEvent::Cleared));
    }

    #[tokio::test]
    async fn test_open_while_locating_is_noop() {
        let (tx, source) = DeferredSource::new();
        let (controller, presenter) = controller_with(Arc::new(source));

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.open(FacilityCategory::Rehabilitation).await }
        });
        wait_for_state(&controller, MapState::Locating).await;
        let first_session = controller.session_id().await;

        let second = controller.open(FacilityCategory::Education).await.unwrap();
        assert_eq!(second, OpenOutcome::AlreadyLocating);
        assert_eq!(controller.session_id().await, first_session);

        tx.send((40.7580, -73.9855)).unwrap();
        task.await.unwrap().unwrap();

        let markers = presenter.markers();
        assert_eq!(markers.len(), 5);
        assert!(markers
            .iter()
            .all(|m| m.popup.category == FacilityCategory::Rehabilitation));
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            failures: 1,
        });
        let (controller, presenter) = controller_with(source);

        let err = controller.open(FacilityCategory::Education).await.unwrap_err();
        assert!(matches!(err, FacilityError::LocationUnavailable(_)));
        assert_eq!(controller.state().await, MapState::Error);
        assert_eq!(controller.last_error().await, Some(err.clone()));
        assert_eq!(
            presenter.events(),
            vec![PresenterEvent::LocationError {
                message: "Unable to retrieve your location: User denied Geolocation".to_string(),
                retryable: true,
            }]
        );

        let outcome = controller.retry().await.unwrap();
        assert!(matches!(outcome, OpenOutcome::Ready { markers: 5, .. }));
        assert_eq!(controller.state().await, MapState::Ready);
        assert_eq!(controller.last_error().await, None);
    }

    #[tokio::test]
    async fn test_retry_outside_error_is_ignored() {
        let (controller, _presenter) =
            controller_with(Arc::new(FixedLocationSource::new(times_square())));
        assert_eq!(controller.retry().await.unwrap(), OpenOutcome::Ignored);
        assert_eq!(controller.state().await, MapState::Idle);
    }

    #[tokio::test]
    async fn test_unsupported_environment() {
        let presenter = Arc::new(RecordingPresenter::new());
        let controller = FacilityMapController::new(
            LocationProvider::unsupported(),
            presenter.clone(),
            seeded_config(),
        );

        let err = controller.open(FacilityCategory::Education).await.unwrap_err();
        assert_eq!(err, FacilityError::GeolocationUnsupported);
        assert_eq!(controller.state().await, MapState::Error);
        assert!(matches!(
            presenter.events().as_slice(),
            [PresenterEvent::LocationError { retryable: false, .. }]
        ));

        controller.close().await;
        assert_eq!(controller.state().await, MapState::Idle);
    }

    #[tokio::test]
    async fn test_close_from_ready_discards_batch() {
        let (controller, presenter) =
            controller_with(Arc::new(FixedLocationSource::new(times_square())));
        controller.open(FacilityCategory::Education).await.unwrap();
        let first_id = controller.facilities().await[0].id();

        controller.close().await;
        assert_eq!(controller.state().await, MapState::Idle);
        assert!(controller.facilities().await.is_empty());
        assert_eq!(controller.reference().await, None);
        assert_eq!(presenter.events().last(), Some(&PresenterEvent::Cleared));
        assert!(controller.select_facility(first_id).await.is_none());
    }

    #[tokio::test]
    async fn test_reopen_generates_fresh_session() {
        let (controller, presenter) =
            controller_with(Arc::new(FixedLocationSource::new(times_square())));

        let first = controller.open(FacilityCategory::Education).await.unwrap();
        let second = controller.open(FacilityCategory::HomelessShelter).await.unwrap();

        let (first_id, second_id) = match (first, second) {
            (
                OpenOutcome::Ready { session_id: a, .. },
                OpenOutcome::Ready { session_id: b, .. },
            ) => (a, b),
            other => panic!("unexpected outcomes {:?}", other),
        };
        assert_ne!(first_id, second_id);
        assert!(presenter.events().contains(&PresenterEvent::Cleared));
        assert_eq!(presenter.markers().len(), 10);
        assert!(controller
            .facilities()
            .await
            .iter()
            .all(|f| f.facility.category == FacilityCategory::HomelessShelter));
    }

    #[tokio::test]
    async fn test_select_facility_notifies_presenter() {
        let (controller, presenter) =
            controller_with(Arc::new(FixedLocationSource::new(times_square())));
        assert!(controller.select_facility(1).await.is_none());

        controller.open(FacilityCategory::Education).await.unwrap();
        let selected = controller.select_facility(3).await.unwrap();
        assert_eq!(selected.id(), 3);
        assert_eq!(
            presenter.events().last(),
            Some(&PresenterEvent::FacilitySelected(selected))
        );
        assert!(controller.select_facility(99).await.is_none());
    }

    #[tokio::test]
    async fn test_configured_counts_are_used() {
        let presenter = Arc::new(RecordingPresenter::new());
        let config = MapConfig {
            facility_count: 8,
            closest_count: 3,
            seed: Some(7),
            ..MapConfig::default()
        };
        let controller = FacilityMapController::new(
            LocationProvider::new(Arc::new(FixedLocationSource::new(times_square()))),
            presenter.clone(),
            config,
        );
        controller.open(FacilityCategory::from("Food Bank")).await.unwrap();

        let markers = presenter.markers();
        assert_eq!(markers.len(), 8);
        assert_eq!(markers.iter().filter(|m| m.is_closest).count(), 3);
        assert!(markers.iter().all(|m| m.style.color == "#ef4444"));
    }
}
