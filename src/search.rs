// Nearby hotel lookup against the place discovery endpoint

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::geolocation::Coordinates;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    SearchRequestFailed(String),

    #[error("Search request failed with HTTP status {status_code}")]
    HttpStatus { status_code: u16 },

    #[error("Malformed discovery response: {0}")]
    MalformedResponse(String),
}

impl SearchError {
    // Every variant is terminal for the invocation and leaves markers untouched
    pub fn is_search_request_failed(&self) -> bool {
        matches!(
            self,
            SearchError::SearchRequestFailed(_)
                | SearchError::HttpStatus { .. }
                | SearchError::MalformedResponse(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

// A discovered place. `data` holds every attribute except the position,
// title included, exactly as the API returned it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawPlace")]
pub struct HotelRecord {
    pub position: Position,
    pub data: Map<String, Value>,
}

impl HotelRecord {
    pub fn new(position: Position, title: &str) -> Self {
        let mut data = Map::new();
        data.insert("title".to_string(), Value::String(title.to_string()));
        Self { position, data }
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn title(&self) -> &str {
        self.data
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawPlace {
    position: Option<Position>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawPlace> for HotelRecord {
    type Error = String;

    fn try_from(raw: RawPlace) -> Result<Self, Self::Error> {
        let position = raw
            .position
            .ok_or_else(|| "place without position".to_string())?;
        if !position.lat.is_finite() || !position.lng.is_finite() {
            return Err("place with non-finite position".to_string());
        }
        match raw.rest.get("title") {
            Some(Value::String(_)) => {}
            _ => return Err("place without title".to_string()),
        }
        Ok(Self {
            position,
            data: raw.rest,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryResponse {
    pub items: Vec<HotelRecord>,
}

impl DiscoveryResponse {
    pub fn parse(body: &str) -> Result<Self, SearchError> {
        serde_json::from_str(body).map_err(|e| SearchError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
pub trait HotelSearchClient: Send + Sync + 'static {
    // One round trip, no retry. An empty Vec means zero matches, not failure
    async fn search(&self, coords: Coordinates) -> Result<Vec<HotelRecord>, SearchError>;
}

pub struct DiscoverySearchClient {
    config: DiscoveryConfig,
    http: Client,
}

impl DiscoverySearchClient {
    pub fn new(config: DiscoveryConfig) -> Result<Self, SearchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SearchError::SearchRequestFailed(e.to_string()))?;
        Ok(Self { config, http })
    }

    // GET {endpoint}?at={lat},{lng}&q={query}&lang={language}&apiKey={key}
    // `at` is written raw so the comma stays literal; the rest is form-encoded
    pub fn request_url(&self, coords: Coordinates) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|e| SearchError::SearchRequestFailed(format!("invalid endpoint: {e}")))?;
        url.set_query(Some(&format!("at={}", coords.to_query_value())));
        url.query_pairs_mut()
            .append_pair("q", &self.config.query)
            .append_pair("lang", &self.config.language)
            .append_pair("apiKey", &self.config.api_key);
        Ok(url)
    }
}

#[async_trait]
impl HotelSearchClient for DiscoverySearchClient {
    async fn search(&self, coords: Coordinates) -> Result<Vec<HotelRecord>, SearchError> {
        let url = self.request_url(coords)?;
        debug!(
            "Discovery request at {} for q={}",
            coords.to_query_value(),
            self.config.query
        );

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::SearchRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Discovery endpoint answered {}", status);
            return Err(SearchError::HttpStatus {
                status_code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::SearchRequestFailed(e.to_string()))?;
        let parsed = DiscoveryResponse::parse(&body)?;
        debug!("Discovery returned {} places", parsed.items.len());
        Ok(parsed.items)
    }
}
