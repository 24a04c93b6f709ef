//! Location records and the fixed category vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::map::MarkerId;

/// A geographic coordinate (latitude, longitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// The fixed classification labels a location can belong to.
///
/// "All Locations" is not a category; it is the [`Filter::All`]
/// pseudo-filter, and no record ever carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    GolfCourses,
    Donuts,
    Breweries,
    MexicanRestaurants,
    Parks,
}

impl Category {
    /// Every real category, in the order the filter widget lists them.
    pub const ALL: [Category; 5] = [
        Category::GolfCourses,
        Category::Donuts,
        Category::Breweries,
        Category::MexicanRestaurants,
        Category::Parks,
    ];

    /// Display label, also used as the nearby-search keyword.
    pub fn label(self) -> &'static str {
        match self {
            Category::GolfCourses => "Golf Courses",
            Category::Donuts => "Donuts",
            Category::Breweries => "Breweries",
            Category::MexicanRestaurants => "Mexican Restaurants",
            Category::Parks => "Parks",
        }
    }

    /// Which placeholder template this category renders before enrichment.
    pub fn template(self) -> TemplateKind {
        match self {
            Category::GolfCourses | Category::Parks => TemplateKind::Outdoor,
            Category::Donuts | Category::Breweries | Category::MexicanRestaurants => {
                TemplateKind::FoodAndDrink
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Placeholder template families. Golf courses and parks share the
/// outdoor wording; the food and drink categories share the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Outdoor,
    FoodAndDrink,
}

/// The active filter selection. `All` is the "All Locations"
/// pseudo-category and matches every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    /// The label "All Locations" shown for the pseudo-category.
    pub const ALL_LABEL: &'static str = "All Locations";

    /// Whether a record of `category` is visible under this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(selected) => selected == category,
        }
    }

    /// Display label for the filter widget.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => Self::ALL_LABEL,
            Filter::Only(category) => category.label(),
        }
    }
}

impl From<Category> for Filter {
    fn from(category: Category) -> Self {
        Filter::Only(category)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Popup content for one record.
///
/// Starts as a category-keyed placeholder and is replaced at most once
/// by a successful enrichment; the registry enforces the at-most-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayPayload {
    Placeholder { content: String },
    Enriched { content: String, photo_url: String },
}

impl DisplayPayload {
    /// Render the pre-enrichment popup body for a named place.
    pub fn placeholder(name: &str, category: Category) -> Self {
        let blurb = match category.template() {
            TemplateKind::Outdoor => "An open-air stop in the neighborhood.",
            TemplateKind::FoodAndDrink => "A local spot for food and drink.",
        };
        DisplayPayload::Placeholder {
            content: format!("<div><h2>{name}</h2><p>{blurb}</p><p>No photo yet.</p></div>"),
        }
    }

    /// Render the post-enrichment popup body embedding its photo.
    pub fn enriched(name: &str, photo_url: &str) -> Self {
        DisplayPayload::Enriched {
            content: format!(
                "<div><h2>{name}</h2><img src=\"{photo_url}\" alt=\"{name}\"></div>"
            ),
            photo_url: photo_url.to_string(),
        }
    }

    /// Whether enrichment has already landed.
    pub fn is_enriched(&self) -> bool {
        matches!(self, DisplayPayload::Enriched { .. })
    }

    /// The popup body shown to the user.
    pub fn content(&self) -> &str {
        match self {
            DisplayPayload::Placeholder { content }
            | DisplayPayload::Enriched { content, .. } => content,
        }
    }
}

/// One discovered point of interest.
///
/// Records are cloned out of the registry as snapshots; the registry
/// copy is the authoritative one. Visibility is never stored here, it
/// is always derived from `category` and the active filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Provider-reported name; the dedup key within a session.
    pub name: String,
    /// The filter category whose search discovered this place.
    pub category: Category,
    /// Immutable once set.
    pub position: GeoPoint,
    /// Handle to this record's on-screen marker, one per record for life.
    pub marker: MarkerId,
    /// Popup content, placeholder until enrichment lands.
    pub payload: DisplayPayload,
    /// When the acquisition pipeline created the record.
    pub discovered_at: DateTime<Utc>,
    /// Discovery order within the registry; stamped on insertion.
    pub(crate) seq: u64,
}

impl LocationRecord {
    /// Create a record carrying its category-keyed placeholder payload.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        position: GeoPoint,
        marker: MarkerId,
    ) -> Self {
        let name = name.into();
        let payload = DisplayPayload::placeholder(&name, category);
        Self {
            name,
            category,
            position,
            marker,
            payload,
            discovered_at: Utc::now(),
            seq: 0,
        }
    }
}
