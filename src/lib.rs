//! Waymark: filter-driven neighborhood map engine
//!
//! An in-memory registry of nearby points of interest, populated
//! asynchronously from a places provider, enriched best-effort with a
//! representative photo, and projected through a category filter onto
//! a map surface's marker set with a single-popup selection model.
//!
//! # Core Concepts
//!
//! - **Records**: one discovered place each, deduplicated by name
//! - **Registry**: the owning store, push-notifying its projections
//! - **Pipelines**: concurrent per-category discovery plus two-stage
//!   photo enrichment
//! - **Projection**: selected filter to visible subset, synchronized
//!   onto the surface's markers and the clickable places list
//!
//! # Example
//!
//! ```
//! use waymark::{Filter, LocationRegistry};
//!
//! let registry = LocationRegistry::new();
//! assert_eq!(registry.filter_by_category(Filter::All).count(), 0);
//! ```

pub mod config;
pub mod map;
pub mod pipeline;
pub mod provider;
mod registry;
pub mod view;

pub use registry::{
    Category, DisplayPayload, Filter, GeoPoint, InsertOutcome, LocationRecord, LocationRegistry,
    RegistryObserver, TemplateKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
