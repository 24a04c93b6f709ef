//! Places provider: nearby search for a category keyword
//!
//! `HttpPlacesClient` speaks a Places-style nearby-search JSON endpoint.
//! `StaticPlaces` serves canned results for tests and the demo shell.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::registry::GeoPoint;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("waymark/", env!("CARGO_PKG_VERSION"));

/// One nearby-search request.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub center: GeoPoint,
    pub radius_m: u32,
    pub keyword: String,
}

/// One candidate place from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub name: String,
    pub position: GeoPoint,
}

/// Shorthand constructor for a [`PlaceHit`].
pub fn hit(name: &str, lat: f64, lng: f64) -> PlaceHit {
    PlaceHit {
        name: name.to_string(),
        position: GeoPoint::new(lat, lng),
    }
}

/// Places provider errors.
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider status: {0}")]
    Status(String),
    #[error("response parse error: {0}")]
    Parse(String),
}

/// The places-search contract.
///
/// An empty result list is a success; provider-side failures map to
/// [`PlacesError`] and scope to the one query that raised them.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Search for places near a point matching a keyword.
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<PlaceHit>, PlacesError>;
}

/// Wire format of the nearby-search endpoint.
#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    name: String,
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

impl NearbyResponse {
    fn into_hits(self) -> Result<Vec<PlaceHit>, PlacesError> {
        match self.status.as_str() {
            "OK" => Ok(self
                .results
                .into_iter()
                .map(|r| PlaceHit {
                    name: r.name,
                    position: GeoPoint::new(r.geometry.location.lat, r.geometry.location.lng),
                })
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(PlacesError::Status(other.to_string())),
        }
    }
}

/// HTTP client for a Places-style nearby-search endpoint.
pub struct HttpPlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPlacesClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PlacesError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlacesProvider for HttpPlacesClient {
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<PlaceHit>, PlacesError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("location", query.center.to_string()),
                ("radius", query.radius_m.to_string()),
                ("keyword", query.keyword.clone()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| PlacesError::Network(e.to_string()))?;

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Parse(e.to_string()))?;
        body.into_hits()
    }
}

/// In-memory provider serving canned hits per keyword.
///
/// Keywords without a registered response return an empty success.
#[derive(Default)]
pub struct StaticPlaces {
    responses: HashMap<String, Result<Vec<PlaceHit>, String>>,
}

impl StaticPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hits for a keyword.
    pub fn with_hits(mut self, keyword: impl Into<String>, hits: Vec<PlaceHit>) -> Self {
        self.responses.insert(keyword.into(), Ok(hits));
        self
    }

    /// Register a provider-status failure for a keyword.
    pub fn with_failure(mut self, keyword: impl Into<String>, status: impl Into<String>) -> Self {
        self.responses.insert(keyword.into(), Err(status.into()));
        self
    }
}

#[async_trait]
impl PlacesProvider for StaticPlaces {
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<PlaceHit>, PlacesError> {
        match self.responses.get(&query.keyword) {
            Some(Ok(hits)) => Ok(hits.clone()),
            Some(Err(status)) => Err(PlacesError::Status(status.clone())),
            None => Ok(Vec::new()),
        }
    }
}
