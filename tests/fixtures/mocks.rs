//! Builders and mock collaborators shared by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use itinerary_planner::error::{PlannerError, Result};
use itinerary_planner::lp::{Assignment, LinearProgram};
use itinerary_planner::poi::{OpeningHours, PlaceCandidate};
use itinerary_planner::solver::{MilpSolver, SolveOutcome, SolveStatus};
use itinerary_planner::traits::{
    DistanceMatrixProvider, Geocoder, HotelSearch, PlaceDetails, PlaceSearch,
};
use itinerary_planner::{Coordinate, Poi};

// ============================================================================
// POI builder
// ============================================================================

/// Builder for test POIs with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestPoi {
    id: String,
    location: Coordinate,
    rating: f64,
    reviews: u32,
    window: (u32, u32),
}

impl TestPoi {
    pub fn new(id: &str, lat: f64, lng: f64) -> Self {
        Self {
            id: id.to_string(),
            location: Coordinate::new(lat, lng),
            rating: 4.0,
            reviews: 100,
            window: (480, 1140),
        }
    }

    pub fn rated(mut self, rating: f64, reviews: u32) -> Self {
        self.rating = rating;
        self.reviews = reviews;
        self
    }

    pub fn open(mut self, opening: u32, closing: u32) -> Self {
        self.window = (opening, closing);
        self
    }

    pub fn build(self) -> Poi {
        let name = self.id.to_uppercase();
        Poi::new(
            self.id,
            name,
            self.location,
            self.rating,
            self.reviews,
            self.window.0,
            self.window.1,
        )
        .expect("valid test POI")
    }
}

// ============================================================================
// Travel times
// ============================================================================

/// Every off-diagonal pair takes the same number of minutes.
#[derive(Clone, Debug)]
pub struct ConstantMatrix(pub f64);

impl DistanceMatrixProvider for ConstantMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<f64>>> {
        let n = locations.len();
        Ok((0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { self.0 }).collect())
            .collect())
    }
}

// ============================================================================
// Solvers
// ============================================================================

/// Always reports the program infeasible.
pub struct InfeasibleSolver;

impl MilpSolver for InfeasibleSolver {
    fn solve(&self, _program: &LinearProgram, _start: Option<&Assignment>, _time_limit: Duration) -> SolveOutcome {
        SolveOutcome {
            status: SolveStatus::Infeasible,
            assignment: None,
            elapsed: Duration::ZERO,
        }
    }
}

/// Runs out of time before finding any incumbent.
pub struct StallingSolver;

impl MilpSolver for StallingSolver {
    fn solve(&self, _program: &LinearProgram, _start: Option<&Assignment>, time_limit: Duration) -> SolveOutcome {
        SolveOutcome {
            status: SolveStatus::TimeLimitReached,
            assignment: None,
            elapsed: time_limit,
        }
    }
}

/// Returns an "optimal" assignment with the named binaries set and everything else zero.
pub struct FixedSolver {
    pub set: Vec<&'static str>,
}

impl MilpSolver for FixedSolver {
    fn solve(&self, program: &LinearProgram, _start: Option<&Assignment>, _time_limit: Duration) -> SolveOutcome {
        let values = program
            .variables
            .iter()
            .map(|var| if self.set.contains(&var.name.as_str()) { 1.0 } else { 0.0 })
            .collect();
        SolveOutcome {
            status: SolveStatus::Optimal,
            assignment: Some(Assignment::new(values)),
            elapsed: Duration::ZERO,
        }
    }
}

/// Wraps another solver and counts calls, and calls that carried a warm start.
pub struct CountingSolver<S> {
    pub inner: S,
    pub calls: AtomicUsize,
    pub warm_starts: AtomicUsize,
}

impl<S> CountingSolver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            warm_starts: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn warm_starts(&self) -> usize {
        self.warm_starts.load(Ordering::SeqCst)
    }
}

impl<S: MilpSolver> MilpSolver for CountingSolver<S> {
    fn solve(&self, program: &LinearProgram, start: Option<&Assignment>, time_limit: Duration) -> SolveOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if start.is_some() {
            self.warm_starts.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.solve(program, start, time_limit)
    }
}

// ============================================================================
// Place services
// ============================================================================

pub struct FixedGeocoder(pub HashMap<&'static str, Coordinate>);

impl Geocoder for FixedGeocoder {
    fn resolve(&self, place_name: &str) -> Result<Coordinate> {
        self.0
            .get(place_name)
            .copied()
            .ok_or_else(|| PlannerError::NotFound(place_name.to_string()))
    }
}

pub struct FixedSearch(pub Vec<PlaceCandidate>);

impl PlaceSearch for FixedSearch {
    fn nearby(&self, _center: Coordinate, _radius_m: u32, _category: &str) -> Result<Vec<PlaceCandidate>> {
        Ok(self.0.clone())
    }
}

pub struct FixedDetails(pub HashMap<String, OpeningHours>);

impl PlaceDetails for FixedDetails {
    fn details(&self, place_id: &str) -> Result<Option<OpeningHours>> {
        Ok(self.0.get(place_id).copied())
    }
}

/// Lodging search returning its candidates in the given (unsorted) order.
pub struct FixedLodging(pub Vec<PlaceCandidate>);

impl HotelSearch for FixedLodging {
    fn nearby_lodging(&self, _center: Coordinate, _radius_m: u32) -> Result<Vec<PlaceCandidate>> {
        Ok(self.0.clone())
    }
}

pub fn candidate(id: &str, rating: f64, reviews: u32, lat: f64, lng: f64) -> PlaceCandidate {
    PlaceCandidate {
        place_id: id.to_string(),
        name: id.to_string(),
        rating,
        review_count: reviews,
        location: Coordinate::new(lat, lng),
        address: None,
    }
}
