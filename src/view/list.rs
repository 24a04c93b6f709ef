//! Visible-places list backing store

use std::sync::{Arc, Mutex};

use super::projection::ProjectionObserver;
use crate::map::MarkerId;
use crate::registry::{Category, LocationRecord};

/// One row of the visible-places list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceEntry {
    pub name: String,
    pub category: Category,
    pub marker: MarkerId,
}

/// Projection consumer backing the clickable list of visible places.
///
/// Display code reads `entries()`; a list click resolves its row's
/// name through the selection controller. Clone the handle freely;
/// all clones share one snapshot.
#[derive(Clone, Default)]
pub struct PlaceList {
    entries: Arc<Mutex<Vec<PlaceEntry>>>,
}

impl PlaceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current visible rows, in discovery order.
    pub fn entries(&self) -> Vec<PlaceEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl ProjectionObserver for PlaceList {
    fn visible_changed(&mut self, visible: &[LocationRecord]) {
        *self.entries.lock().unwrap() = visible
            .iter()
            .map(|record| PlaceEntry {
                name: record.name.clone(),
                category: record.category,
                marker: record.marker,
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Filter, GeoPoint, LocationRegistry};
    use crate::view::SharedProjection;

    #[test]
    fn list_tracks_the_visible_subset() {
        let registry = Arc::new(LocationRegistry::new());
        let projection = SharedProjection::for_registry(registry.clone());
        let list = PlaceList::new();
        projection.subscribe(Box::new(list.clone()));

        registry.insert_if_absent(LocationRecord::new(
            "Baker's",
            Category::Donuts,
            GeoPoint::new(38.8, -121.2),
            MarkerId::new(),
        ));
        registry.insert_if_absent(LocationRecord::new(
            "Johnson Pool",
            Category::Parks,
            GeoPoint::new(38.8, -121.24),
            MarkerId::new(),
        ));

        assert_eq!(list.len(), 2);

        projection.set_filter(Filter::Only(Category::Parks));
        let entries = list.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Johnson Pool");
        assert_eq!(entries[0].category, Category::Parks);
    }
}
