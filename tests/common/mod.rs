//! Common wiring helpers for the scenario tests
//!
//! Builds the full reactive stack (registry, projection, synchronizer,
//! places list) over a headless surface, plus shortcuts for inserting
//! records the way the acquisition pipeline does.

use std::sync::Arc;

use waymark::map::{icons, HeadlessSurface, MapSurface, MarkerId, MarkerSpec};
use waymark::view::{MarkerSynchronizer, PlaceList, SharedProjection};
use waymark::{Category, GeoPoint, LocationRecord, LocationRegistry};

pub struct TestApp {
    pub registry: Arc<LocationRegistry>,
    pub surface: Arc<HeadlessSurface>,
    pub projection: SharedProjection,
    pub list: PlaceList,
}

/// Wire registry, projection, synchronizer, and places list together.
pub fn wire_app() -> TestApp {
    let registry = Arc::new(LocationRegistry::new());
    let surface = Arc::new(HeadlessSurface::new());
    let projection = SharedProjection::for_registry(registry.clone());
    projection.subscribe(Box::new(MarkerSynchronizer::new(
        registry.clone(),
        surface.clone(),
    )));
    let list = PlaceList::new();
    projection.subscribe(Box::new(list.clone()));
    TestApp {
        registry,
        surface,
        projection,
        list,
    }
}

impl TestApp {
    /// Insert a place the way acquisition does: marker first, then the
    /// record. Returns the marker handle.
    pub fn insert_place(&self, name: &str, category: Category) -> MarkerId {
        let position = GeoPoint::new(38.79, -121.23);
        let marker = self.surface.create_marker(MarkerSpec {
            position,
            title: name.to_string(),
            icon: icons::default_icon(category),
        });
        self.registry
            .insert_if_absent(LocationRecord::new(name, category, position, marker));
        marker
    }
}
