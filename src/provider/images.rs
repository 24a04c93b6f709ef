//! Image provider: two-stage venue then photo lookup
//!
//! Enrichment needs exactly one representative photo URL per place,
//! found in two dependent steps: match the place to a venue, then ask
//! for that venue's photos. `HttpImageClient` speaks a venue-API shape
//! with those two endpoints; `StaticImages` serves canned matches.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::registry::GeoPoint;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("waymark/", env!("CARGO_PKG_VERSION"));
/// API version date the venue endpoints expect.
const API_VERSION: &str = "20180323";

/// Venue-search input: the place's position and name.
#[derive(Debug, Clone)]
pub struct VenueQuery {
    pub position: GeoPoint,
    pub name: String,
}

/// A matched venue identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueMatch {
    pub venue_id: String,
}

/// A representative photo for a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMatch {
    pub photo_url: String,
}

/// Image provider errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider status: {0}")]
    Status(String),
    #[error("response parse error: {0}")]
    Parse(String),
}

/// The two-stage image-search contract.
///
/// `Ok(None)` is the empty-result outcome and is distinct from an
/// error; enrichment treats both as "keep the placeholder".
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Find the venue id for a named place near a position.
    async fn search_venue(&self, query: &VenueQuery) -> Result<Option<VenueMatch>, ImageError>;

    /// Find a representative photo for a venue.
    async fn search_photos(&self, venue_id: &str) -> Result<Option<PhotoMatch>, ImageError>;
}

#[derive(Debug, Deserialize)]
struct VenueSearchResponse {
    response: VenueSearchBody,
}

#[derive(Debug, Deserialize)]
struct VenueSearchBody {
    #[serde(default)]
    venues: Vec<WireVenue>,
}

#[derive(Debug, Deserialize)]
struct WireVenue {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    response: PhotoSearchBody,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchBody {
    photos: Option<WirePhotoGroup>,
}

#[derive(Debug, Deserialize)]
struct WirePhotoGroup {
    #[serde(default)]
    items: Vec<WirePhoto>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    prefix: String,
    suffix: String,
}

impl WirePhoto {
    /// Photos come as a prefix/suffix pair joined by a size segment.
    fn url(&self) -> String {
        format!("{}original{}", self.prefix, self.suffix)
    }
}

/// HTTP client for a venue-API style image provider.
pub struct HttpImageClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpImageClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ImageError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    fn auth_params(&self) -> [(&'static str, String); 3] {
        [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("v", API_VERSION.to_string()),
        ]
    }
}

#[async_trait]
impl ImageProvider for HttpImageClient {
    async fn search_venue(&self, query: &VenueQuery) -> Result<Option<VenueMatch>, ImageError> {
        let url = format!("{}/venues/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&self.auth_params())
            .query(&[
                ("ll", query.position.to_string()),
                ("query", query.name.clone()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ImageError::Network(e.to_string()))?;

        let body: VenueSearchResponse = response
            .json()
            .await
            .map_err(|e| ImageError::Parse(e.to_string()))?;

        Ok(body
            .response
            .venues
            .into_iter()
            .next()
            .map(|v| VenueMatch { venue_id: v.id }))
    }

    async fn search_photos(&self, venue_id: &str) -> Result<Option<PhotoMatch>, ImageError> {
        let url = format!("{}/venues/{}/photos", self.base_url, venue_id);
        let response = self
            .http
            .get(&url)
            .query(&self.auth_params())
            .send()
            .await
            .map_err(|e| ImageError::Network(e.to_string()))?;

        let body: PhotoSearchResponse = response
            .json()
            .await
            .map_err(|e| ImageError::Parse(e.to_string()))?;

        Ok(body
            .response
            .photos
            .and_then(|group| group.items.into_iter().next())
            .map(|photo| PhotoMatch { photo_url: photo.url() }))
    }
}

/// In-memory provider with canned venue and photo matches.
///
/// Unregistered names and venue ids resolve to `Ok(None)`; a failing
/// instance errors on every call.
#[derive(Default)]
pub struct StaticImages {
    venues: HashMap<String, String>,
    photos: HashMap<String, String>,
    failing: bool,
}

impl StaticImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that fails every call.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Register a venue match for a place name.
    pub fn with_venue(mut self, name: impl Into<String>, venue_id: impl Into<String>) -> Self {
        self.venues.insert(name.into(), venue_id.into());
        self
    }

    /// Register a photo for a venue id.
    pub fn with_photo(mut self, venue_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.photos.insert(venue_id.into(), url.into());
        self
    }
}

#[async_trait]
impl ImageProvider for StaticImages {
    async fn search_venue(&self, query: &VenueQuery) -> Result<Option<VenueMatch>, ImageError> {
        if self.failing {
            return Err(ImageError::Status("configured to fail".to_string()));
        }
        Ok(self
            .venues
            .get(&query.name)
            .map(|id| VenueMatch { venue_id: id.clone() }))
    }

    async fn search_photos(&self, venue_id: &str) -> Result<Option<PhotoMatch>, ImageError> {
        if self.failing {
            return Err(ImageError::Status("configured to fail".to_string()));
        }
        Ok(self
            .photos
            .get(venue_id)
            .map(|url| PhotoMatch { photo_url: url.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: &str) -> VenueQuery {
        VenueQuery {
            position: GeoPoint::new(38.79, -121.23),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn static_provider_resolves_venue_then_photo() {
        let provider = StaticImages::new()
            .with_venue("Joe's Pizza", "v-42")
            .with_photo("v-42", "https://img.example/joes.jpg");

        let venue = provider.search_venue(&query("Joe's Pizza")).await.unwrap().unwrap();
        assert_eq!(venue.venue_id, "v-42");

        let photo = provider.search_photos("v-42").await.unwrap().unwrap();
        assert_eq!(photo.photo_url, "https://img.example/joes.jpg");
    }

    #[tokio::test]
    async fn unregistered_name_is_empty_not_error() {
        let provider = StaticImages::new();
        assert!(provider.search_venue(&query("Nowhere")).await.unwrap().is_none());
        assert!(provider.search_photos("v-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failing_provider_errors_on_both_stages() {
        let provider = StaticImages::failing();
        assert!(provider.search_venue(&query("Anywhere")).await.is_err());
        assert!(provider.search_photos("v-1").await.is_err());
    }

    #[test]
    fn photo_url_joins_prefix_and_suffix() {
        let raw = r#"{
            "response": {
                "photos": {
                    "items": [{"prefix": "https://img.example/p/", "suffix": "/joes.jpg"}]
                }
            }
        }"#;
        let body: PhotoSearchResponse = serde_json::from_str(raw).unwrap();
        let photo = body.response.photos.unwrap().items.into_iter().next().unwrap();
        assert_eq!(photo.url(), "https://img.example/p/original/joes.jpg");
    }

    #[test]
    fn venue_search_with_no_venues_parses_to_empty() {
        let body: VenueSearchResponse = serde_json::from_str(r#"{"response": {}}"#).unwrap();
        assert!(body.response.venues.is_empty());
    }
}
