//! Single-popup selection state machine
//!
//! At most one popup is open at any time, tracked as the marker it is
//! anchored to. Clicks arrive from the surface or from the visible
//! places list; hover highlighting is cosmetic and bypasses the state
//! machine entirely. Handlers are synchronous and must run inside a
//! Tokio runtime, which hosts the timer that stops the bounce.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::map::{icons, MapSurface, MarkerAnimation, MarkerId};
use crate::registry::LocationRegistry;

/// Bounce length before the scheduled stop.
pub const DEFAULT_BOUNCE: Duration = Duration::from_millis(1400);

/// The at-most-one-open popup controller.
pub struct SelectionController {
    registry: Arc<LocationRegistry>,
    surface: Arc<dyn MapSurface>,
    open: Option<MarkerId>,
    bounce: Duration,
}

impl SelectionController {
    /// Create a controller in the closed state.
    pub fn new(registry: Arc<LocationRegistry>, surface: Arc<dyn MapSurface>) -> Self {
        Self {
            registry,
            surface,
            open: None,
            bounce: DEFAULT_BOUNCE,
        }
    }

    /// Override the bounce duration.
    pub fn with_bounce(mut self, bounce: Duration) -> Self {
        self.bounce = bounce;
        self
    }

    /// The marker the popup is currently anchored to, if any.
    pub fn open_marker(&self) -> Option<MarkerId> {
        self.open
    }

    /// A click on a marker, from the surface or via the places list.
    ///
    /// Re-clicking the open marker stops a running bounce and leaves
    /// the popup as-is. Clicking any other marker bounces it, fills
    /// the popup from the record's current payload, and opens it.
    pub fn marker_clicked(&mut self, marker: MarkerId, title: &str) {
        if self.open == Some(marker) {
            if self.surface.animation(marker).is_some() {
                self.surface.set_animation(marker, None);
            }
            warn!(title, "popup already open on this marker");
            return;
        }

        self.toggle_bounce(marker);

        let content = match self.registry.find_by_marker(marker) {
            Some(record) => record.payload.content().to_string(),
            None => format!("<div>{title}</div>"),
        };
        self.surface.open_popup(marker, &content);
        self.open = Some(marker);
    }

    /// A click on a visible-places list entry.
    pub fn place_selected(&mut self, name: &str) {
        match self.registry.find_by_name(name) {
            Some(record) => {
                debug!(name, "place selected from list");
                self.marker_clicked(record.marker, &record.name);
            }
            None => warn!(name, "selected place is not registered"),
        }
    }

    /// The surface reported the popup's close control was used.
    pub fn popup_closed(&mut self) {
        self.open = None;
    }

    /// Hover highlighting. Pure icon swap, no popup interaction.
    pub fn hover_changed(&self, marker: MarkerId, entered: bool) {
        if entered {
            self.surface.set_icon(marker, icons::highlight_icon());
        } else if let Some(record) = self.registry.find_by_marker(marker) {
            self.surface.set_icon(marker, icons::default_icon(record.category));
        }
    }

    /// Start the bounce and schedule its stop; a bounce already
    /// running is stopped instead.
    fn toggle_bounce(&self, marker: MarkerId) {
        if self.surface.animation(marker).is_some() {
            self.surface.set_animation(marker, None);
            return;
        }
        self.surface.set_animation(marker, Some(MarkerAnimation::Bounce));

        let surface = Arc::clone(&self.surface);
        let bounce = self.bounce;
        tokio::spawn(async move {
            tokio::time::sleep(bounce).await;
            surface.set_animation(marker, None);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{HeadlessSurface, MarkerIcon, MarkerSpec};
    use crate::registry::{Category, GeoPoint, LocationRecord};

    struct Fixture {
        registry: Arc<LocationRegistry>,
        surface: Arc<HeadlessSurface>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: Arc::new(LocationRegistry::new()),
                surface: Arc::new(HeadlessSurface::new()),
            }
        }

        fn insert(&self, name: &str, category: Category) -> MarkerId {
            let marker = self.surface.create_marker(MarkerSpec {
                position: GeoPoint::new(38.79, -121.23),
                title: name.to_string(),
                icon: icons::default_icon(category),
            });
            self.registry.insert_if_absent(LocationRecord::new(
                name,
                category,
                GeoPoint::new(38.79, -121.23),
                marker,
            ));
            marker
        }

        fn controller(&self) -> SelectionController {
            SelectionController::new(self.registry.clone(), self.surface.clone())
                .with_bounce(Duration::from_millis(10))
        }
    }

    #[tokio::test]
    async fn click_opens_popup_with_record_payload() {
        let fx = Fixture::new();
        let marker = fx.insert("Baker's", Category::Donuts);
        let mut controller = fx.controller();

        controller.marker_clicked(marker, "Baker's");

        assert_eq!(controller.open_marker(), Some(marker));
        let popup = fx.surface.popup().unwrap();
        assert_eq!(popup.anchor, marker);
        assert!(popup.content.contains("Baker's"));
        assert!(popup.content.contains("food and drink"));
    }

    #[tokio::test]
    async fn reclick_is_idempotent() {
        let fx = Fixture::new();
        let marker = fx.insert("Baker's", Category::Donuts);
        let mut controller = fx.controller();

        controller.marker_clicked(marker, "Baker's");
        let popup_before = fx.surface.popup();

        controller.marker_clicked(marker, "Baker's");

        assert_eq!(controller.open_marker(), Some(marker));
        assert_eq!(fx.surface.popup(), popup_before);
    }

    #[tokio::test]
    async fn clicking_another_marker_moves_the_popup() {
        let fx = Fixture::new();
        let first = fx.insert("Baker's", Category::Donuts);
        let second = fx.insert("Johnson Pool", Category::Parks);
        let mut controller = fx.controller();

        controller.marker_clicked(first, "Baker's");
        controller.marker_clicked(second, "Johnson Pool");

        assert_eq!(controller.open_marker(), Some(second));
        assert_eq!(fx.surface.popup().unwrap().anchor, second);
    }

    #[tokio::test]
    async fn popup_close_returns_to_closed_state() {
        let fx = Fixture::new();
        let marker = fx.insert("Baker's", Category::Donuts);
        let mut controller = fx.controller();

        controller.marker_clicked(marker, "Baker's");
        controller.popup_closed();

        assert_eq!(controller.open_marker(), None);

        // Closed state: a new click on the same marker re-opens.
        controller.marker_clicked(marker, "Baker's");
        assert_eq!(controller.open_marker(), Some(marker));
    }

    #[tokio::test]
    async fn list_selection_delegates_to_marker_click() {
        let fx = Fixture::new();
        let marker = fx.insert("Knee Deep", Category::Breweries);
        let mut controller = fx.controller();

        controller.place_selected("Knee Deep");
        assert_eq!(controller.open_marker(), Some(marker));

        // Unknown names leave the state machine alone.
        controller.place_selected("Atlantis Taproom");
        assert_eq!(controller.open_marker(), Some(marker));
    }

    #[tokio::test]
    async fn unregistered_marker_falls_back_to_bare_title() {
        let fx = Fixture::new();
        let stray = fx.surface.create_marker(MarkerSpec {
            position: GeoPoint::new(38.79, -121.23),
            title: "Stray".to_string(),
            icon: icons::highlight_icon(),
        });
        let mut controller = fx.controller();

        controller.marker_clicked(stray, "Stray");
        assert_eq!(fx.surface.popup().unwrap().content, "<div>Stray</div>");
    }

    #[tokio::test]
    async fn bounce_starts_and_stops_on_schedule() {
        let fx = Fixture::new();
        let marker = fx.insert("Baker's", Category::Donuts);
        let mut controller = fx.controller();

        controller.marker_clicked(marker, "Baker's");
        assert_eq!(fx.surface.animation(marker), Some(MarkerAnimation::Bounce));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fx.surface.animation(marker).is_none());
    }

    #[tokio::test]
    async fn reclick_stops_a_running_bounce() {
        let fx = Fixture::new();
        let marker = fx.insert("Baker's", Category::Donuts);
        let mut controller = fx.controller();

        controller.marker_clicked(marker, "Baker's");
        assert!(fx.surface.animation(marker).is_some());

        controller.marker_clicked(marker, "Baker's");
        assert!(fx.surface.animation(marker).is_none());
    }

    #[tokio::test]
    async fn hover_swaps_icons_without_touching_popup() {
        let fx = Fixture::new();
        let marker = fx.insert("Johnson Pool", Category::Parks);
        let mut controller = fx.controller();
        controller.marker_clicked(marker, "Johnson Pool");

        controller.hover_changed(marker, true);
        assert_eq!(fx.surface.icon_of(marker), Some(icons::highlight_icon()));

        controller.hover_changed(marker, false);
        assert_eq!(
            fx.surface.icon_of(marker),
            Some(icons::default_icon(Category::Parks))
        );

        // Popup untouched throughout.
        assert_eq!(controller.open_marker(), Some(marker));
        assert_eq!(fx.surface.popup().unwrap().anchor, marker);
    }

    #[tokio::test]
    async fn hover_exit_on_unregistered_marker_keeps_icon() {
        let fx = Fixture::new();
        let stray = fx.surface.create_marker(MarkerSpec {
            position: GeoPoint::new(38.79, -121.23),
            title: "Stray".to_string(),
            icon: MarkerIcon::tinted("abcdef"),
        });
        let controller = fx.controller();

        controller.hover_changed(stray, true);
        controller.hover_changed(stray, false);
        // No record to restore from; the highlight stays.
        assert_eq!(fx.surface.icon_of(stray), Some(icons::highlight_icon()));
    }
}
