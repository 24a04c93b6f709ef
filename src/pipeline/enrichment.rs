//! Best-effort photo enrichment
//!
//! Two chained provider calls per record: match the venue, then fetch
//! a photo. Any miss or failure at either stage leaves the placeholder
//! payload in place. Nothing is retried and nothing here is fatal.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::provider::{ImageProvider, VenueQuery};
use crate::registry::{DisplayPayload, GeoPoint, LocationRegistry};

/// How one enrichment chain ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The record's payload was rewritten with a photo.
    Enriched,
    /// Venue search succeeded but matched nothing.
    NoVenue,
    /// Photo search succeeded but the venue has no photos.
    NoPhoto,
    /// The venue search itself failed.
    VenueSearchFailed(String),
    /// The photo search itself failed.
    PhotoSearchFailed(String),
    /// The registry refused the update: record gone or already enriched.
    NotApplied,
}

/// Runs the venue-then-photo chain for newly acquired records.
pub struct EnrichmentPipeline {
    registry: Arc<LocationRegistry>,
    images: Arc<dyn ImageProvider>,
}

impl EnrichmentPipeline {
    pub fn new(registry: Arc<LocationRegistry>, images: Arc<dyn ImageProvider>) -> Self {
        Self { registry, images }
    }

    /// Run one record's enrichment chain to completion.
    ///
    /// Strictly ordered internally: the photo search is only issued
    /// after a venue match. Chains for different records are fully
    /// independent and unordered relative to each other.
    pub async fn enrich(&self, name: &str, position: GeoPoint) -> EnrichmentOutcome {
        let query = VenueQuery {
            position,
            name: name.to_string(),
        };
        let venue = match self.images.search_venue(&query).await {
            Ok(Some(venue)) => venue,
            Ok(None) => return EnrichmentOutcome::NoVenue,
            Err(e) => return EnrichmentOutcome::VenueSearchFailed(e.to_string()),
        };

        let photo = match self.images.search_photos(&venue.venue_id).await {
            Ok(Some(photo)) => photo,
            Ok(None) => return EnrichmentOutcome::NoPhoto,
            Err(e) => return EnrichmentOutcome::PhotoSearchFailed(e.to_string()),
        };

        let payload = DisplayPayload::enriched(name, &photo.photo_url);
        if self.registry.update_payload(name, payload) {
            EnrichmentOutcome::Enriched
        } else {
            EnrichmentOutcome::NotApplied
        }
    }

    /// Fire-and-forget variant used by acquisition: spawn the chain as
    /// its own task and log its outcome.
    pub fn spawn(self: Arc<Self>, name: String, position: GeoPoint) -> JoinHandle<EnrichmentOutcome> {
        let pipeline = self;
        tokio::spawn(async move {
            let outcome = pipeline.enrich(&name, position).await;
            match &outcome {
                EnrichmentOutcome::Enriched => debug!(%name, "photo enrichment applied"),
                EnrichmentOutcome::NoVenue | EnrichmentOutcome::NoPhoto => {
                    debug!(%name, ?outcome, "no photo available")
                }
                EnrichmentOutcome::VenueSearchFailed(e)
                | EnrichmentOutcome::PhotoSearchFailed(e) => {
                    warn!(%name, error = %e, "photo enrichment failed")
                }
                EnrichmentOutcome::NotApplied => debug!(%name, "enrichment skipped"),
            }
            outcome
        })
    }
}
