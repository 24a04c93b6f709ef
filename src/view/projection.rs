//! Filter projection: selected filter to visible records
//!
//! A push-based derivation with an explicit observer list. Recomputes
//! whenever the selection changes or the registry reports new
//! contents, then notifies observers in registration order. The
//! shared handle serializes updates, so no two resyncs interleave.

use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::registry::{Filter, LocationRecord, LocationRegistry, RegistryObserver};

/// Consumers of the visible-records snapshot.
pub trait ProjectionObserver: Send {
    /// Called with the full visible snapshot after every recompute.
    fn visible_changed(&mut self, visible: &[LocationRecord]);
}

/// The derived "currently visible" projection over the registry.
///
/// Owns the selected filter; the registry never sees it. Observers
/// are notified synchronously, in registration order.
pub struct FilterProjection {
    registry: Arc<LocationRegistry>,
    selected: Filter,
    observers: Vec<Box<dyn ProjectionObserver>>,
}

impl FilterProjection {
    /// Create a projection with the default "All Locations" selection.
    pub fn new(registry: Arc<LocationRegistry>) -> Self {
        Self {
            registry,
            selected: Filter::All,
            observers: Vec::new(),
        }
    }

    /// Register an observer. It does not fire until the next recompute.
    pub fn subscribe(&mut self, observer: Box<dyn ProjectionObserver>) {
        self.observers.push(observer);
    }

    /// The current selection.
    pub fn selected(&self) -> Filter {
        self.selected
    }

    /// The visible subset under the current selection, in discovery
    /// order.
    pub fn visible(&self) -> Vec<LocationRecord> {
        self.registry.filter_by_category(self.selected).collect()
    }

    /// Change the selection and resync every consumer.
    pub fn set_filter(&mut self, filter: Filter) {
        debug!(filter = %filter, "filter selected");
        self.selected = filter;
        self.recompute();
    }

    /// React to registry content changes under the current selection.
    pub fn registry_changed(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        let visible = self.visible();
        for observer in &mut self.observers {
            observer.visible_changed(&visible);
        }
    }
}

/// Shared projection handle.
///
/// One lock serializes filter changes and registry notifications, and
/// the handle doubles as the registry observer that closes the
/// reactive loop: insert, recompute, resync.
#[derive(Clone)]
pub struct SharedProjection {
    inner: Arc<Mutex<FilterProjection>>,
}

impl SharedProjection {
    /// Build a projection over `registry` and subscribe it to content
    /// changes.
    pub fn for_registry(registry: Arc<LocationRegistry>) -> Self {
        let shared = Self {
            inner: Arc::new(Mutex::new(FilterProjection::new(registry.clone()))),
        };
        registry.add_observer(Arc::new(shared.clone()));
        shared
    }

    /// Register a projection observer.
    pub fn subscribe(&self, observer: Box<dyn ProjectionObserver>) {
        self.inner.lock().unwrap().subscribe(observer);
    }

    /// Change the selection and resync every consumer.
    pub fn set_filter(&self, filter: Filter) {
        self.inner.lock().unwrap().set_filter(filter);
    }

    /// The current selection.
    pub fn selected(&self) -> Filter {
        self.inner.lock().unwrap().selected()
    }

    /// The visible subset under the current selection.
    pub fn visible(&self) -> Vec<LocationRecord> {
        self.inner.lock().unwrap().visible()
    }
}

impl RegistryObserver for SharedProjection {
    fn registry_changed(&self) {
        self.inner.lock().unwrap().registry_changed();
    }
}
