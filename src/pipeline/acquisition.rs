//! Category fan-out discovery
//!
//! One nearby search per real category, all concurrent and
//! failure-isolated. Results dedup against the registry by name;
//! survivors get a category-tinted marker and an independent
//! enrichment task. Marker attachment is not done here: the
//! synchronizer reacts to each insertion and attaches exactly the
//! visible subset.

use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use super::enrichment::{EnrichmentOutcome, EnrichmentPipeline};
use crate::map::{icons, MapSurface, MarkerSpec};
use crate::provider::{NearbyQuery, PlacesProvider};
use crate::registry::{Category, GeoPoint, InsertOutcome, LocationRecord, LocationRegistry};

/// Search geometry for a session.
#[derive(Debug, Clone, Copy)]
pub struct SearchArea {
    pub center: GeoPoint,
    pub radius_m: u32,
}

/// How one category's search went.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    /// Records this category contributed to the registry.
    pub inserted: usize,
    /// Results dropped because their name was already registered.
    pub duplicates: usize,
    /// Set when the search failed outright; the category contributed
    /// zero records.
    pub failure: Option<String>,
}

/// The combined result of one acquisition run.
pub struct AcquisitionReport {
    /// One report per category, in completion order.
    pub categories: Vec<CategoryReport>,
    /// Enrichment chains spawned during the run, possibly still in
    /// flight.
    pub enrichment: Vec<JoinHandle<EnrichmentOutcome>>,
}

impl AcquisitionReport {
    /// Records inserted across all categories.
    pub fn total_inserted(&self) -> usize {
        self.categories.iter().map(|c| c.inserted).sum()
    }

    /// Wait for every spawned enrichment chain to settle.
    pub async fn drain_enrichment(self) -> Vec<EnrichmentOutcome> {
        let mut outcomes = Vec::with_capacity(self.enrichment.len());
        for handle in self.enrichment {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "enrichment task panicked"),
            }
        }
        outcomes
    }
}

/// Populates the registry from the places provider.
pub struct AcquisitionPipeline {
    registry: Arc<LocationRegistry>,
    places: Arc<dyn PlacesProvider>,
    surface: Arc<dyn MapSurface>,
    enrichment: Arc<EnrichmentPipeline>,
    area: SearchArea,
    result_cap: usize,
}

impl AcquisitionPipeline {
    pub fn new(
        registry: Arc<LocationRegistry>,
        places: Arc<dyn PlacesProvider>,
        surface: Arc<dyn MapSurface>,
        enrichment: Arc<EnrichmentPipeline>,
        area: SearchArea,
        result_cap: usize,
    ) -> Self {
        Self {
            registry,
            places,
            surface,
            enrichment,
            area,
            result_cap,
        }
    }

    /// Search every category concurrently and populate the registry.
    ///
    /// Category completions are unordered; one category's failure
    /// never aborts the others. Dedup holds under any interleaving
    /// because the registry's insert is the authoritative guard.
    pub async fn run(self: Arc<Self>) -> AcquisitionReport {
        let mut searches = JoinSet::new();
        for category in Category::ALL {
            let pipeline = Arc::clone(&self);
            searches.spawn(async move { pipeline.acquire_category(category).await });
        }

        let mut categories = Vec::new();
        let mut enrichment = Vec::new();
        while let Some(joined) = searches.join_next().await {
            match joined {
                Ok((report, handles)) => {
                    categories.push(report);
                    enrichment.extend(handles);
                }
                Err(e) => error!(error = %e, "category search task panicked"),
            }
        }
        AcquisitionReport {
            categories,
            enrichment,
        }
    }

    async fn acquire_category(
        &self,
        category: Category,
    ) -> (CategoryReport, Vec<JoinHandle<EnrichmentOutcome>>) {
        let query = NearbyQuery {
            center: self.area.center,
            radius_m: self.area.radius_m,
            keyword: category.label().to_string(),
        };

        let mut report = CategoryReport {
            category,
            inserted: 0,
            duplicates: 0,
            failure: None,
        };
        let mut handles = Vec::new();

        let hits = match self.places.nearby_search(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                error!(category = %category, error = %e, "nearby search failed");
                report.failure = Some(e.to_string());
                return (report, handles);
            }
        };

        info!(category = %category, hits = hits.len(), "nearby search succeeded");
        for hit in hits.into_iter().take(self.result_cap) {
            if self.registry.contains(&hit.name) {
                warn!(name = %hit.name, "already registered, dropping duplicate");
                report.duplicates += 1;
                continue;
            }

            let marker = self.surface.create_marker(MarkerSpec {
                position: hit.position,
                title: hit.name.clone(),
                icon: icons::default_icon(category),
            });

            let record = LocationRecord::new(hit.name.clone(), category, hit.position, marker);
            match self.registry.insert_if_absent(record) {
                InsertOutcome::Inserted(stored) => {
                    report.inserted += 1;
                    handles.push(
                        Arc::clone(&self.enrichment).spawn(stored.name, stored.position),
                    );
                }
                InsertOutcome::Existing(_) => {
                    // Lost the insertion race to another category's
                    // task; the marker created above was never attached.
                    warn!(name = %hit.name, "already registered, dropping duplicate");
                    report.duplicates += 1;
                }
            }
        }

        (report, handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::HeadlessSurface;
    use crate::provider::{hit, StaticImages, StaticPlaces};
    use crate::registry::Filter;

    const AREA: SearchArea = SearchArea {
        center: GeoPoint { lat: 38.7907339, lng: -121.2357828 },
        radius_m: 8000,
    };

    struct Harness {
        registry: Arc<LocationRegistry>,
        surface: Arc<HeadlessSurface>,
        pipeline: Arc<AcquisitionPipeline>,
    }

    fn harness(places: StaticPlaces, images: StaticImages) -> Harness {
        let registry = Arc::new(LocationRegistry::new());
        let surface = Arc::new(HeadlessSurface::new());
        let enrichment = Arc::new(EnrichmentPipeline::new(registry.clone(), Arc::new(images)));
        let pipeline = Arc::new(AcquisitionPipeline::new(
            registry.clone(),
            Arc::new(places),
            surface.clone(),
            enrichment,
            AREA,
            5,
        ));
        Harness {
            registry,
            surface,
            pipeline,
        }
    }

    #[tokio::test]
    async fn result_cap_discards_later_hits() {
        let places = StaticPlaces::new().with_hits(
            "Donuts",
            (0..8).map(|i| hit(&format!("Shop {i}"), 38.8, -121.2)).collect(),
        );
        let h = harness(places, StaticImages::new());

        let report = h.pipeline.clone().run().await;
        assert_eq!(report.total_inserted(), 5);
        assert_eq!(h.registry.len(), 5);
    }

    #[tokio::test]
    async fn cross_category_name_collision_keeps_first() {
        let places = StaticPlaces::new()
            .with_hits("Donuts", vec![hit("Joe's Pizza", 38.8, -121.2)])
            .with_hits("Mexican Restaurants", vec![hit("Joe's Pizza", 38.8, -121.2)]);
        let h = harness(places, StaticImages::new());

        let report = h.pipeline.clone().run().await;
        assert_eq!(h.registry.len(), 1);

        let duplicates: usize = report.categories.iter().map(|c| c.duplicates).sum();
        assert_eq!(report.total_inserted(), 1);
        assert_eq!(duplicates, 1);
    }

    #[tokio::test]
    async fn failing_category_is_isolated() {
        let places = StaticPlaces::new()
            .with_failure("Parks", "OVER_QUERY_LIMIT")
            .with_hits("Breweries", vec![hit("Knee Deep", 38.8, -121.22)]);
        let h = harness(places, StaticImages::new());

        let report = h.pipeline.clone().run().await;

        let parks = report
            .categories
            .iter()
            .find(|c| c.category == Category::Parks)
            .unwrap();
        assert!(parks.failure.is_some());
        assert_eq!(parks.inserted, 0);

        assert_eq!(h.registry.len(), 1);
        assert!(h.registry.contains("Knee Deep"));
    }

    #[tokio::test]
    async fn markers_are_created_detached() {
        let places = StaticPlaces::new().with_hits("Parks", vec![hit("Johnson Pool", 38.8, -121.24)]);
        let h = harness(places, StaticImages::new());

        h.pipeline.clone().run().await;

        let record = h.registry.find_by_name("Johnson Pool").unwrap();
        assert_eq!(h.surface.marker_count(), 1);
        assert!(!h.surface.is_attached(record.marker));
        assert_eq!(h.surface.title_of(record.marker).as_deref(), Some("Johnson Pool"));
    }

    #[tokio::test]
    async fn enrichment_runs_for_inserted_records() {
        let places = StaticPlaces::new().with_hits("Donuts", vec![hit("Baker's", 38.8, -121.2)]);
        let images = StaticImages::new()
            .with_venue("Baker's", "v-7")
            .with_photo("v-7", "https://img.example/bakers.jpg");
        let h = harness(places, images);

        let report = h.pipeline.clone().run().await;
        let outcomes = report.drain_enrichment().await;

        assert_eq!(outcomes, vec![EnrichmentOutcome::Enriched]);
        let record = h.registry.find_by_name("Baker's").unwrap();
        assert!(record.payload.content().contains("bakers.jpg"));
    }

    #[tokio::test]
    async fn empty_categories_contribute_nothing() {
        let h = harness(StaticPlaces::new(), StaticImages::new());

        let report = h.pipeline.clone().run().await;
        assert_eq!(report.total_inserted(), 0);
        assert_eq!(report.categories.len(), Category::ALL.len());
        assert_eq!(h.registry.filter_by_category(Filter::All).count(), 0);
    }
}
