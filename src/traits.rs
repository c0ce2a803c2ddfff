//! Collaborator interfaces consumed by the planner.
//!
//! These are intentionally minimal. The crate ships HTTP-backed
//! implementations, but any data source with the same signatures will do.

use crate::error::Result;
use crate::poi::{Coordinate, OpeningHours, PlaceCandidate};

/// Provides a travel-time matrix for a set of locations.
///
/// The matrix is indexed by the provided location order; entries are minutes.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<f64>>>;
}

/// Resolves a free-form place name to a coordinate.
pub trait Geocoder {
    /// Fails with `PlannerError::NotFound` when the name cannot be resolved.
    fn resolve(&self, place_name: &str) -> Result<Coordinate>;
}

/// Nearby search for sightseeing candidates.
pub trait PlaceSearch {
    fn nearby(&self, center: Coordinate, radius_m: u32, category: &str)
    -> Result<Vec<PlaceCandidate>>;
}

/// Per-place opening hours lookup.
pub trait PlaceDetails {
    /// `None` when the service has no usable hours for the place.
    fn details(&self, place_id: &str) -> Result<Option<OpeningHours>>;
}

/// Nearby search for lodging.
pub trait HotelSearch {
    /// Candidates ranked by descending prominence.
    fn nearby_lodging(&self, center: Coordinate, radius_m: u32) -> Result<Vec<PlaceCandidate>>;
}
