//! Resolves free-text place names to coordinates.

pub mod error;
pub mod nominatim;

use crate::geocode::error::GeocodeError;
use crate::types::location::LatLon;
use std::future::Future;

/// Turns a place name into a single coordinate pair.
pub trait Geocoder {
    /// Returns the best match for `query`, or [`GeocodeError::NotFound`].
    fn geocode(&self, query: &str) -> impl Future<Output = Result<LatLon, GeocodeError>>;
}
