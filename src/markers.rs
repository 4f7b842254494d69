// Map marker descriptors and the projection from discovered places

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::WidgetConfig;
use crate::geolocation::Coordinates;
use crate::search::HotelRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerIcon {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub draggable: bool,
    pub icon: Option<MarkerIcon>,
    pub payload: Option<Map<String, Value>>,
}

impl MapMarker {
    // The single draggable, iconless marker standing for the user
    pub fn user(coords: Coordinates) -> Self {
        Self {
            lat: coords.latitude,
            lng: coords.longitude,
            draggable: true,
            icon: None,
            payload: None,
        }
    }

    pub fn move_to(&mut self, coords: Coordinates) {
        self.lat = coords.latitude;
        self.lng = coords.longitude;
    }

    pub fn title(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|data| data.get("title"))
            .and_then(Value::as_str)
    }
}

pub struct MarkerProjector {
    icon: MarkerIcon,
}

impl MarkerProjector {
    pub fn new(icon: MarkerIcon) -> Self {
        Self { icon }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(MarkerIcon {
            url: config.hotel_icon_url.clone(),
            width: config.hotel_icon_size,
            height: config.hotel_icon_size,
        })
    }

    // One fixed-icon, non-draggable marker per record, in input order
    pub fn project(&self, records: Vec<HotelRecord>) -> Vec<MapMarker> {
        records
            .into_iter()
            .map(|record| MapMarker {
                lat: record.position.lat,
                lng: record.position.lng,
                draggable: false,
                icon: Some(self.icon.clone()),
                payload: Some(record.data),
            })
            .collect()
    }
}
