// Root view: sequences location -> search -> markers -> slider and reacts to user actions

use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::booking::{BookingForm, Field, FieldError, SubmissionState};
use crate::config::WidgetConfig;
use crate::geolocation::{Coordinates, GeolocationError, GeolocationProbe};
use crate::markers::{MapMarker, MarkerProjector};
use crate::modal::{ModalService, BOOKING_MODAL_ID};
use crate::search::{HotelSearchClient, SearchError};
use crate::slider::{DragGestureController, ScrollContainer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Invalid drag event: {0}")]
    InvalidDragEvent(#[from] GeolocationError),

    #[error("Malformed drag event payload: {0}")]
    MalformedDragEvent(String),

    #[error("Marker is not a hotel marker")]
    NotAHotelMarker,

    #[error("Form error: {0}")]
    Form(#[from] FieldError),
}

// Payload the map emits when the user pin is dropped
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerDragEvent {
    pub coords: DragCoords,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DragCoords {
    pub lat: f64,
    pub lng: f64,
}

impl MarkerDragEvent {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            coords: DragCoords { lat, lng },
        }
    }

    pub fn from_json(payload: &str) -> Result<Self, ViewError> {
        serde_json::from_str(payload).map_err(|e| ViewError::MalformedDragEvent(e.to_string()))
    }

    pub fn coordinates(&self) -> Result<Coordinates, GeolocationError> {
        Coordinates::new(self.coords.lat, self.coords.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Initializing,
    Located,
    Ready,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub phase: LifecyclePhase,
    pub center: Coordinates,
    pub zoom: u8,
    pub user_marker: MapMarker,
    pub hotels: Vec<MapMarker>,
    pub form: BookingForm,
    pub slider_armed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { request_id: u64, markers: usize },
    // A newer search was issued while this one was in flight
    Stale { request_id: u64 },
}

pub struct Initialized<C: ScrollContainer> {
    pub slider: DragGestureController<C>,
    pub location: Result<Coordinates, GeolocationError>,
    pub search: Result<SearchOutcome, SearchError>,
}

pub struct ViewOrchestrator<G, S, M>
where
    G: GeolocationProbe,
    S: HotelSearchClient,
    M: ModalService,
{
    geolocation: G,
    search: S,
    modal: M,
    projector: MarkerProjector,
    state: Mutex<ViewState>,
    latest_request: AtomicU64,
}

impl<G, S, M> ViewOrchestrator<G, S, M>
where
    G: GeolocationProbe,
    S: HotelSearchClient,
    M: ModalService,
{
    pub fn new(config: WidgetConfig, geolocation: G, search: S, modal: M) -> Self {
        let projector = MarkerProjector::from_config(&config);
        let state = ViewState {
            phase: LifecyclePhase::Initializing,
            center: config.default_center,
            zoom: config.zoom,
            user_marker: MapMarker::user(config.default_center),
            hotels: Vec::new(),
            form: BookingForm::new(),
            slider_armed: false,
        };
        Self {
            geolocation,
            search,
            modal,
            projector,
            state: Mutex::new(state),
            latest_request: AtomicU64::new(0),
        }
    }

    // First render. Geolocation failure falls back to the default center
    pub async fn initialize<C: ScrollContainer>(&self, hotel_list: C) -> Initialized<C> {
        let location = self.geolocation.acquire().await;
        let center = match &location {
            Ok(coords) => {
                info!("Location acquired: {}", coords.to_query_value());
                let mut state = self.state.lock();
                state.phase = LifecyclePhase::Located;
                state.center = *coords;
                state.user_marker.move_to(*coords);
                *coords
            }
            Err(e) => {
                let center = self.state.lock().center;
                warn!(
                    "{}, searching around default {}",
                    e,
                    center.to_query_value()
                );
                center
            }
        };

        let search = self.load_hotels(center).await;

        let slider = DragGestureController::arm(hotel_list);
        {
            let mut state = self.state.lock();
            state.slider_armed = true;
            state.phase = LifecyclePhase::Ready;
        }
        info!("View ready");

        Initialized {
            slider,
            location,
            search,
        }
    }

    // Search around `coords` and replace the hotel markers with the result.
    // Failures and stale responses leave the current markers untouched
    pub async fn load_hotels(&self, coords: Coordinates) -> Result<SearchOutcome, SearchError> {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Hotel search #{} at {}",
            request_id,
            coords.to_query_value()
        );

        let records = match self.search.search(coords).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Hotel search #{} failed: {}", request_id, e);
                return Err(e);
            }
        };

        let mut state = self.state.lock();
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!("Discarding stale hotel search #{}", request_id);
            return Ok(SearchOutcome::Stale { request_id });
        }
        state.hotels = self.projector.project(records);
        let markers = state.hotels.len();
        info!("Hotel search #{} placed {} markers", request_id, markers);

        Ok(SearchOutcome::Applied {
            request_id,
            markers,
        })
    }

    // The slider is not rearmed here
    pub async fn marker_drag_end(
        &self,
        event: &MarkerDragEvent,
    ) -> Result<Result<SearchOutcome, SearchError>, ViewError> {
        let coords = event.coordinates()?;
        {
            let mut state = self.state.lock();
            state.center = coords;
            state.user_marker.move_to(coords);
        }
        Ok(self.load_hotels(coords).await)
    }

    pub fn map_clicked(&self, coords: Coordinates) {
        debug!("Map clicked at {}", coords.to_query_value());
    }

    // Fresh form pre-filled with the hotel title, then show the booking modal
    pub fn open_booking(&self, marker: &MapMarker) -> Result<(), ViewError> {
        if marker.draggable {
            return Err(ViewError::NotAHotelMarker);
        }
        let title = marker.title().ok_or(ViewError::NotAHotelMarker)?;
        {
            let mut state = self.state.lock();
            state.form.reset();
            state.form.set_hotel(title);
        }
        info!("Opening booking for {}", title);
        self.modal.open(BOOKING_MODAL_ID);
        Ok(())
    }

    pub fn open_booking_at(&self, index: usize) -> Result<(), ViewError> {
        let marker = self
            .state
            .lock()
            .hotels
            .get(index)
            .cloned()
            .ok_or(ViewError::NotAHotelMarker)?;
        self.open_booking(&marker)
    }

    // Form state is kept as-is
    pub fn close_modal(&self, id: &str) {
        debug!("Closing modal {}", id);
        self.modal.close(id);
    }

    pub fn input(&self, field: Field, value: &str) -> Result<(), ViewError> {
        self.state.lock().form.input(field, value)?;
        Ok(())
    }

    pub fn blur(&self, field: Field) {
        self.state.lock().form.blur(field);
    }

    pub fn submit_booking(&self) -> SubmissionState {
        self.state.lock().form.submit()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.lock().phase
    }

    pub fn hotels(&self) -> Vec<MapMarker> {
        self.state.lock().hotels.clone()
    }

    pub fn user_marker(&self) -> MapMarker {
        self.state.lock().user_marker.clone()
    }

    pub fn form(&self) -> BookingForm {
        self.state.lock().form.clone()
    }

    pub fn modal(&self) -> &M {
        &self.modal
    }

    pub fn search_client(&self) -> &S {
        &self.search
    }
}
