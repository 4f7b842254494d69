// One-shot location acquisition
// The platform capability is behind GeolocationProbe; its raw payload is validated
// into Coordinates before anything else sees it

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Location unavailable: platform has no geolocation capability")]
    LocationUnavailable,

    #[error("Location denied: {0}")]
    LocationDenied(String),

    #[error("Invalid coordinates: lat={latitude}, lng={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeolocationError> {
        let in_range = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(GeolocationError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    // "lat,lng" as the discovery endpoint's `at` parameter expects it
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

// Shape of the platform's "get current position" success payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformPosition {
    pub coords: PlatformCoords,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformCoords {
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<PlatformPosition> for Coordinates {
    type Error = GeolocationError;

    fn try_from(position: PlatformPosition) -> Result<Self, Self::Error> {
        Coordinates::new(position.coords.latitude, position.coords.longitude)
    }
}

#[async_trait]
pub trait GeolocationProbe: Send + Sync + 'static {
    // Suspends until the platform resolves a single fix; never retries
    async fn acquire(&self) -> Result<Coordinates, GeolocationError>;
}

// Probe with a predetermined outcome, for headless runs and tests
#[derive(Debug, Clone)]
pub enum StaticLocation {
    Fix(Coordinates),
    Unavailable,
    Denied(String),
}

#[async_trait]
impl GeolocationProbe for StaticLocation {
    async fn acquire(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            StaticLocation::Fix(coords) => Ok(*coords),
            StaticLocation::Unavailable => Err(GeolocationError::LocationUnavailable),
            StaticLocation::Denied(reason) => Err(GeolocationError::LocationDenied(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_payload_is_validated() {
        let json = r#"{"coords":{"latitude":52.52,"longitude":13.405,"accuracy":20}}"#;
        let position: PlatformPosition = serde_json::from_str(json).unwrap();
        let coords = Coordinates::try_from(position).unwrap();
        assert_eq!(coords.latitude, 52.52);
        assert_eq!(coords.longitude, 13.405);

        let json = r#"{"coords":{"latitude":123.0,"longitude":13.405}}"#;
        let position: PlatformPosition = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Coordinates::try_from(position),
            Err(GeolocationError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_malformed_platform_payload_rejected() {
        let json = r#"{"coords":{"latitude":"north"}}"#;
        assert!(serde_json::from_str::<PlatformPosition>(json).is_err());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_query_value() {
        let coords = Coordinates::new(51.0, 8.5).unwrap();
        assert_eq!(coords.to_query_value(), "51,8.5");
    }

    #[test]
    fn test_static_probe_outcomes() {
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        tokio_test::block_on(async {
            assert_eq!(StaticLocation::Fix(coords).acquire().await, Ok(coords));
            assert_eq!(
                StaticLocation::Unavailable.acquire().await,
                Err(GeolocationError::LocationUnavailable)
            );
            assert_eq!(
                StaticLocation::Denied("permission denied".to_string())
                    .acquire()
                    .await,
                Err(GeolocationError::LocationDenied(
                    "permission denied".to_string()
                ))
            );
        });
    }
}
