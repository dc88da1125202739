// src/map/mod.rs - Facility map session and the data handed to the rendering layer
pub mod controller;
pub mod popup;
pub mod presenter;
pub mod view;

pub use controller::{FacilityMapController, MapState, OpenOutcome};
pub use popup::{directions_url, MarkerData, MarkerStyle, PopupContent};
pub use presenter::{MapPresenter, PresenterEvent, RecordingPresenter};
pub use view::{MapView, TileLayer};
