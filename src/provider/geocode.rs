//! Startup geocoding of the base address
//!
//! Used exactly once per session to recenter the surface on the
//! configured address; failure leaves the default center in place.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::registry::GeoPoint;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("waymark/", env!("CARGO_PKG_VERSION"));

/// Geocoder errors.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("no result for address: {0}")]
    NotFound(String),
    #[error("provider status: {0}")]
    Status(String),
    #[error("response parse error: {0}")]
    Parse(String),
}

/// The address-to-coordinate contract.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: WireLatLng,
}

#[derive(Debug, Deserialize)]
struct WireLatLng {
    lat: f64,
    lng: f64,
}

/// HTTP client for a geocoding endpoint.
pub struct HttpGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("address", address.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        if body.status != "OK" {
            return Err(GeocodeError::Status(body.status));
        }
        body.results
            .into_iter()
            .next()
            .map(|r| GeoPoint::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}

/// Fixed-answer geocoder for tests and the demo shell.
#[derive(Default)]
pub struct StaticGeocoder {
    answers: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known address.
    pub fn with_answer(mut self, address: impl Into<String>, position: GeoPoint) -> Self {
        self.answers.insert(address.into(), position);
        self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        self.answers
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}
