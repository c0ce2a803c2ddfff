//! Haversine travel-time estimator.
//!
//! Uses great-circle distance at an assumed average transit speed.
//! A stand-in for a road-network query; `OsrmClient` implements the same trait.

use crate::error::Result;
use crate::traits::DistanceMatrixProvider;

/// Average transit speed assumption, in km per minute.
const DEFAULT_SPEED_KM_PER_MIN: f64 = 0.5;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average speed in km/min.
    pub speed_km_per_min: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_km_per_min: DEFAULT_SPEED_KM_PER_MIN,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_km_per_min: f64) -> Self {
        Self { speed_km_per_min }
    }

    /// Convert distance in km to travel time in minutes.
    pub fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_km_per_min
    }
}

/// Great-circle distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<f64>>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.km_to_minutes(haversine_km(*from, *to));
                }
            }
        }

        Ok(matrix)
    }
}
