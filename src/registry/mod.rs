//! Core location data structures and the session registry

mod record;
mod store;


pub use record::{Category, DisplayPayload, Filter, GeoPoint, LocationRecord, TemplateKind};
pub use store::{InsertOutcome, LocationRegistry, RegistryObserver};
