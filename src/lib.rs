// Nearby hotel finder widget core
// Location -> discovery search -> map markers, a drag-to-scroll hotel list and a booking form

pub mod booking;
pub mod config;
pub mod geolocation;
pub mod markers;
pub mod modal;
pub mod search;
pub mod slider;
pub mod view;

// Re-export key types for convenience
pub use booking::{BookingDetails, BookingForm, Field, FieldError, SubmissionState, ValidationError};
pub use config::{ConfigError, DiscoveryConfig, WidgetConfig};
pub use geolocation::{Coordinates, GeolocationError, GeolocationProbe, PlatformPosition, StaticLocation};
pub use markers::{MapMarker, MarkerIcon, MarkerProjector};
pub use modal::{ModalService, RecordingModalService, BOOKING_MODAL_ID};
pub use search::{DiscoveryResponse, DiscoverySearchClient, HotelRecord, HotelSearchClient, Position, SearchError};
pub use slider::{DragGestureController, EventDisposition, ScrollContainer, SliderEvent, TouchPoint};
pub use view::{Initialized, LifecyclePhase, MarkerDragEvent, SearchOutcome, ViewError, ViewOrchestrator, ViewState};
