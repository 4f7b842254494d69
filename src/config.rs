// Widget configuration: discovery endpoint, credentials and map defaults
// The API key is always supplied from outside (environment or caller), never compiled in

use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::geolocation::Coordinates;

pub const DEFAULT_ENDPOINT: &str = "https://discover.search.hereapi.com/v1/discover";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_QUERY: &str = "hotel";
pub const DEFAULT_ZOOM: u8 = 12;
pub const HOTEL_ICON_URL: &str = "./assets/home-icon.svg";
pub const HOTEL_ICON_SIZE: u32 = 32;

pub const API_KEY_VAR: &str = "HERE_API_KEY";
pub const ENDPOINT_VAR: &str = "HOTEL_FINDER_ENDPOINT";
pub const LANGUAGE_VAR: &str = "HOTEL_FINDER_LANG";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

// Settings for the place discovery call
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    pub endpoint: String,
    pub language: String,
    pub query: String,
    pub api_key: String,
    // None leaves the HTTP stack's own defaults in place
    pub timeout_ms: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            query: DEFAULT_QUERY.to_string(),
            api_key: String::new(),
            timeout_ms: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    // Reads HERE_API_KEY (required) plus optional endpoint/language overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .ok_or_else(|| {
                warn!("{API_KEY_VAR} not set");
                ConfigError::MissingVar(API_KEY_VAR.to_string())
            })?;
        if api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: API_KEY_VAR.to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let endpoint = lookup(ENDPOINT_VAR).unwrap_or_else(|| {
            info!("{ENDPOINT_VAR} not set, using default: {DEFAULT_ENDPOINT}");
            DEFAULT_ENDPOINT.to_string()
        });
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: ENDPOINT_VAR.to_string(),
                message: format!("not an http(s) url: {endpoint}"),
            });
        }

        let language = lookup(LANGUAGE_VAR).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            endpoint,
            language,
            api_key,
            ..Default::default()
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// Everything the root view needs besides its collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub discovery: DiscoveryConfig,
    pub zoom: u8,
    pub default_center: Coordinates,
    pub hotel_icon_url: String,
    pub hotel_icon_size: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            zoom: DEFAULT_ZOOM,
            default_center: Coordinates {
                latitude: 51.0,
                longitude: 8.0,
            },
            hotel_icon_url: HOTEL_ICON_URL.to_string(),
            hotel_icon_size: HOTEL_ICON_SIZE,
        }
    }
}

impl WidgetConfig {
    pub fn new(discovery: DiscoveryConfig) -> Self {
        Self {
            discovery,
            ..Default::default()
        }
    }
}
