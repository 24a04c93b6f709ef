//! The drawable surface contract the engine renders against
//!
//! The engine never talks to a concrete map SDK. It places and removes
//! pin markers and anchors a single popup through this trait; the host
//! surface delivers user events (clicks, hovers, popup close) back by
//! calling the selection controller's handler methods.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::GeoPoint;

/// Unique handle for one on-screen marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(Uuid);

impl MarkerId {
    /// Create a new random MarkerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tinted pin icon. The hex color selects the tint; how the pin is
/// drawn is the surface's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIcon {
    pub color: String,
}

impl MarkerIcon {
    /// An icon tinted with a hex color such as `"33cc33"`.
    pub fn tinted(color: impl Into<String>) -> Self {
        Self { color: color.into() }
    }
}

/// Marker animations the engine can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAnimation {
    Bounce,
}

/// Everything needed to create a marker.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    pub position: GeoPoint,
    pub title: String,
    pub icon: MarkerIcon,
}

/// The map surface contract.
///
/// Markers are created detached; the visibility synchronizer owns
/// attachment. The surface manages at most one popup at a time.
pub trait MapSurface: Send + Sync {
    /// Create a marker, initially detached from the surface.
    fn create_marker(&self, spec: MarkerSpec) -> MarkerId;

    /// Show the marker. Attaching an attached marker is a no-op.
    fn attach(&self, marker: MarkerId);

    /// Hide the marker. Detaching a detached marker is a no-op.
    fn detach(&self, marker: MarkerId);

    /// Swap the marker's icon (hover highlight and restore).
    fn set_icon(&self, marker: MarkerId, icon: MarkerIcon);

    /// Start (`Some`) or stop (`None`) a marker animation.
    fn set_animation(&self, marker: MarkerId, animation: Option<MarkerAnimation>);

    /// The marker's currently running animation, if any.
    fn animation(&self, marker: MarkerId) -> Option<MarkerAnimation>;

    /// Open the popup anchored to `marker`, replacing any open popup.
    fn open_popup(&self, marker: MarkerId, content: &str);

    /// Close the popup if one is open.
    fn close_popup(&self);

    /// Recenter the viewport.
    fn set_center(&self, center: GeoPoint);
}
