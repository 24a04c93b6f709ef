//! Reactive view layer: projection, synchronization, selection

mod list;
mod projection;
mod selection;
mod sync;

pub use list::{PlaceEntry, PlaceList};
pub use projection::{FilterProjection, ProjectionObserver, SharedProjection};
pub use selection::{SelectionController, DEFAULT_BOUNCE};
pub use sync::MarkerSynchronizer;
