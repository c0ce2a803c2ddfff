//! Local planar projection used as clustering features.

use crate::haversine::EARTH_RADIUS_KM;
use crate::poi::Coordinate;

/// Offset from a reference pin, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(&self, other: &PlanarPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Equirectangular projection of `point` around `reference`.
///
/// Only accurate for city-scale spans.
pub fn project(reference: Coordinate, point: Coordinate) -> PlanarPoint {
    let ref_lat = reference.lat.to_radians();
    let d_lat = point.lat.to_radians() - ref_lat;
    let d_lng = point.lng.to_radians() - reference.lng.to_radians();

    PlanarPoint {
        x: EARTH_RADIUS_KM * ref_lat.cos() * d_lng,
        y: EARTH_RADIUS_KM * d_lat,
    }
}

pub fn project_all(reference: Coordinate, points: &[Coordinate]) -> Vec<PlanarPoint> {
    points.iter().map(|point| project(reference, *point)).collect()
}
