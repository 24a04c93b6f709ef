//! External provider contracts and clients
//!
//! Each collaborator is a trait seam with an HTTP implementation and
//! an in-memory one for tests and the demo shell.

mod geocode;
mod images;
mod places;

pub use geocode::{GeocodeError, Geocoder, HttpGeocoder, StaticGeocoder};
pub use images::{
    HttpImageClient, ImageError, ImageProvider, PhotoMatch, StaticImages, VenueMatch, VenueQuery,
};
pub use places::{
    hit, HttpPlacesClient, NearbyQuery, PlaceHit, PlacesError, PlacesProvider, StaticPlaces,
};
