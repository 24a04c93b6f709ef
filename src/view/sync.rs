//! Marker visibility synchronization

use std::sync::Arc;

use super::projection::ProjectionObserver;
use crate::map::MapSurface;
use crate::registry::{Filter, LocationRecord, LocationRegistry};

/// Keeps the surface's attached-marker set equal to the visible subset.
///
/// Every update detaches all registry markers and re-attaches the
/// visible ones. Linear in registry size per change, fine at this
/// scale; updates are serialized by the projection lock, so a resync
/// always completes before the next filter change is processed.
pub struct MarkerSynchronizer {
    registry: Arc<LocationRegistry>,
    surface: Arc<dyn MapSurface>,
}

impl MarkerSynchronizer {
    pub fn new(registry: Arc<LocationRegistry>, surface: Arc<dyn MapSurface>) -> Self {
        Self { registry, surface }
    }
}

impl ProjectionObserver for MarkerSynchronizer {
    fn visible_changed(&mut self, visible: &[LocationRecord]) {
        for record in self.registry.filter_by_category(Filter::All) {
            self.surface.detach(record.marker);
        }
        for record in visible {
            self.surface.attach(record.marker);
        }
    }
}
