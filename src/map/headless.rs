//! In-memory map surface
//!
//! Tracks marker state without rendering anything. The demo shell runs
//! against it, and the test suites use it to observe attachment,
//! popup, icon, and animation behavior.

use std::collections::HashMap;
use std::sync::Mutex;

use super::surface::{MapSurface, MarkerAnimation, MarkerIcon, MarkerId, MarkerSpec};
use crate::registry::GeoPoint;

#[derive(Debug, Clone)]
struct MarkerState {
    spec: MarkerSpec,
    attached: bool,
    icon: MarkerIcon,
    animation: Option<MarkerAnimation>,
}

/// Popup state as the surface sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    pub anchor: MarkerId,
    pub content: String,
}

#[derive(Debug, Default)]
struct SurfaceState {
    markers: HashMap<MarkerId, MarkerState>,
    popup: Option<OpenPopup>,
    center: Option<GeoPoint>,
}

/// A [`MapSurface`] that renders nothing and remembers everything.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    state: Mutex<SurfaceState>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently attached, in no particular order.
    pub fn attached(&self) -> Vec<MarkerId> {
        self.state
            .lock()
            .unwrap()
            .markers
            .iter()
            .filter(|(_, m)| m.attached)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether a marker is currently attached.
    pub fn is_attached(&self, marker: MarkerId) -> bool {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .is_some_and(|m| m.attached)
    }

    /// Total markers ever created on this surface.
    pub fn marker_count(&self) -> usize {
        self.state.lock().unwrap().markers.len()
    }

    /// The open popup, if any.
    pub fn popup(&self) -> Option<OpenPopup> {
        self.state.lock().unwrap().popup.clone()
    }

    /// A marker's current icon.
    pub fn icon_of(&self, marker: MarkerId) -> Option<MarkerIcon> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .map(|m| m.icon.clone())
    }

    /// A marker's creation title.
    pub fn title_of(&self, marker: MarkerId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .map(|m| m.spec.title.clone())
    }

    /// The most recent recenter, if any.
    pub fn center(&self) -> Option<GeoPoint> {
        self.state.lock().unwrap().center
    }
}

impl MapSurface for HeadlessSurface {
    fn create_marker(&self, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId::new();
        let mut state = self.state.lock().unwrap();
        state.markers.insert(
            id,
            MarkerState {
                icon: spec.icon.clone(),
                spec,
                attached: false,
                animation: None,
            },
        );
        id
    }

    fn attach(&self, marker: MarkerId) {
        if let Some(m) = self.state.lock().unwrap().markers.get_mut(&marker) {
            m.attached = true;
        }
    }

    fn detach(&self, marker: MarkerId) {
        if let Some(m) = self.state.lock().unwrap().markers.get_mut(&marker) {
            m.attached = false;
        }
    }

    fn set_icon(&self, marker: MarkerId, icon: MarkerIcon) {
        if let Some(m) = self.state.lock().unwrap().markers.get_mut(&marker) {
            m.icon = icon;
        }
    }

    fn set_animation(&self, marker: MarkerId, animation: Option<MarkerAnimation>) {
        if let Some(m) = self.state.lock().unwrap().markers.get_mut(&marker) {
            m.animation = animation;
        }
    }

    fn animation(&self, marker: MarkerId) -> Option<MarkerAnimation> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .and_then(|m| m.animation)
    }

    fn open_popup(&self, marker: MarkerId, content: &str) {
        self.state.lock().unwrap().popup = Some(OpenPopup {
            anchor: marker,
            content: content.to_string(),
        });
    }

    fn close_popup(&self) {
        self.state.lock().unwrap().popup = None;
    }

    fn set_center(&self, center: GeoPoint) {
        self.state.lock().unwrap().center = Some(center);
    }
}
