//! LocationRegistry: the owning store of discovered locations

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::record::{DisplayPayload, Filter, LocationRecord};
use crate::map::MarkerId;

/// Push-based notification of registry content changes.
///
/// Observers are invoked synchronously after each successful insertion.
/// Payload updates do not notify; they never change visibility.
pub trait RegistryObserver: Send + Sync {
    fn registry_changed(&self);
}

/// Outcome of an insert-if-absent call.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// First insertion under this name; the stored record.
    Inserted(LocationRecord),
    /// A record with this name already existed; the stored record.
    Existing(LocationRecord),
}

impl InsertOutcome {
    /// The stored record either way.
    pub fn record(&self) -> &LocationRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::Existing(record) => record,
        }
    }

    /// True if this call performed the insertion.
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// The owning store of all discovered location records for a session.
///
/// Names are unique: the first insertion wins and later ones are
/// dropped, which keeps overlapping category searches from producing
/// duplicates under any completion order. Records are never removed
/// during a session.
#[derive(Default)]
pub struct LocationRegistry {
    records: DashMap<String, LocationRecord>,
    next_seq: AtomicU64,
    observers: Mutex<Vec<Arc<dyn RegistryObserver>>>,
}

impl LocationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to content-change notifications.
    pub fn add_observer(&self, observer: Arc<dyn RegistryObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    /// Insert a record unless its name is already taken.
    ///
    /// On first insertion the record is stamped with the next discovery
    /// sequence number and observers are notified; otherwise the
    /// pre-existing record is returned untouched. Idempotent.
    pub fn insert_if_absent(&self, record: LocationRecord) -> InsertOutcome {
        let outcome = match self.records.entry(record.name.clone()) {
            Entry::Occupied(entry) => InsertOutcome::Existing(entry.get().clone()),
            Entry::Vacant(slot) => {
                let mut record = record;
                record.seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let stored = record.clone();
                slot.insert(record);
                InsertOutcome::Inserted(stored)
            }
        };
        // The entry guard is released above; observers may read the map.
        if outcome.is_inserted() {
            self.notify();
        }
        outcome
    }

    /// Look up a record by its name.
    pub fn find_by_name(&self, name: &str) -> Option<LocationRecord> {
        self.records.get(name).map(|entry| entry.clone())
    }

    /// Resolve a marker handle back to its record.
    ///
    /// Linear scan; markers and records are one-to-one so the first
    /// match is the only match.
    pub fn find_by_marker(&self, marker: MarkerId) -> Option<LocationRecord> {
        self.records
            .iter()
            .find(|entry| entry.marker == marker)
            .map(|entry| entry.clone())
    }

    /// Records matching `filter`, in discovery order.
    ///
    /// A pure snapshot projection over current contents; calling it
    /// again restarts over whatever the registry holds by then.
    pub fn filter_by_category(&self, filter: Filter) -> impl Iterator<Item = LocationRecord> {
        let mut matching: Vec<LocationRecord> = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.category))
            .map(|entry| entry.clone())
            .collect();
        matching.sort_by_key(|record| record.seq);
        matching.into_iter()
    }

    /// Replace a record's placeholder payload.
    ///
    /// Returns `false` without touching anything when the record is
    /// missing or already enriched; enrichment lands at most once.
    pub fn update_payload(&self, name: &str, payload: DisplayPayload) -> bool {
        match self.records.get_mut(name) {
            Some(mut record) if !record.payload.is_enriched() => {
                record.payload = payload;
                true
            }
            _ => false,
        }
    }

    /// Whether a record with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of records discovered so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True before the first insertion.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn notify(&self) {
        // Clone the list out of the lock so an observer can subscribe
        // others without deadlocking.
        let observers: Vec<_> = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer.registry_changed();
        }
    }
}
