//! Category marker palette

use super::surface::MarkerIcon;
use crate::registry::Category;

/// Hover highlight tint shared by every category.
pub const HIGHLIGHT_COLOR: &str = "FFFF24";

/// Default tint for a category's markers.
pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::GolfCourses => "000099",
        Category::Donuts => "ff4d94",
        Category::Breweries => "663300",
        Category::MexicanRestaurants => "ff9900",
        Category::Parks => "33cc33",
    }
}

/// The icon a category's markers wear by default.
pub fn default_icon(category: Category) -> MarkerIcon {
    MarkerIcon::tinted(category_color(category))
}

/// The shared hover icon.
pub fn highlight_icon() -> MarkerIcon {
    MarkerIcon::tinted(HIGHLIGHT_COLOR)
}
