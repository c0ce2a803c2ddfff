//! End-to-end planning: cluster, anchor the hotel, then solve each day independently.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::clustering::{self, Cluster};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::itinerary::Itinerary;
use crate::lp::Assignment;
use crate::matrix::DistanceMatrix;
use crate::insertion;
use crate::model::{RouteModel, check_windows};
use crate::poi::{Coordinate, HOTEL_ID, Hotel, PlaceCandidate, Poi, PoiId};
use crate::route::reconstruct;
use crate::solver::{MilpSolver, SolveStatus};
use crate::traits::{DistanceMatrixProvider, HotelSearch};

/// Radius searched for lodging around the hotel anchor, in meters.
const LODGING_RADIUS_M: u32 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledVisit {
    pub poi: Poi,
    pub arrival: f64,
    pub departure: f64,
}

#[derive(Debug, Clone)]
pub struct DayPlan {
    /// Zero-based; day 0 is the most prominent cluster.
    pub day: usize,
    pub cluster_id: usize,
    pub cluster_mean_prominence: f64,
    pub status: SolveStatus,
    /// Node ids from hotel to hotel.
    pub path: Vec<PoiId>,
    pub visits: Vec<ScheduledVisit>,
    pub prominence: f64,
    pub itinerary: Itinerary,
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub hotel: Hotel,
    /// Lodging near the hotel anchor, best first. Empty without a lodging search.
    pub lodging: Vec<PlaceCandidate>,
    pub largest_cluster: usize,
    pub days: Vec<DayPlan>,
}

pub struct ItineraryPlanner<M, S> {
    config: PlannerConfig,
    matrix_provider: M,
    solver: S,
    lodging: Option<Box<dyn HotelSearch + Send + Sync>>,
}

impl<M, S> ItineraryPlanner<M, S>
where
    M: DistanceMatrixProvider,
    S: MilpSolver,
{
    pub fn new(config: PlannerConfig, matrix_provider: M, solver: S) -> Self {
        Self {
            config,
            matrix_provider,
            solver,
            lodging: None,
        }
    }

    /// Moves the hotel to the most prominent lodging near the largest cluster.
    pub fn with_lodging_search(mut self, search: impl HotelSearch + Send + Sync + 'static) -> Self {
        self.lodging = Some(Box::new(search));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `config.days` routes over `pois`, projected around `reference`.
    pub fn plan(&self, pois: &[Poi], reference: Coordinate) -> Result<Plan> {
        let config = &self.config;
        config.validate()?;
        check_ids(pois)?;
        let distinct = pois
            .iter()
            .map(|p| (p.location.lat.to_bits(), p.location.lng.to_bits()))
            .collect::<HashSet<_>>()
            .len();
        if config.days > distinct {
            return Err(PlannerError::configuration(format!(
                "{} days requested but only {distinct} distinct POI locations are available",
                config.days
            )));
        }
        check_windows(pois, config.dwell_time)?;

        let clustering = clustering::partition(pois, reference, config)?;
        let anchor = clustering.hotel_anchor();
        let (hotel, lodging) = self.place_hotel(anchor)?;
        let matrix = DistanceMatrix::build(&hotel, pois, &self.matrix_provider)?;

        let models = clustering
            .ranked
            .iter()
            .enumerate()
            .map(|(day, cluster)| {
                RouteModel::build(day, cluster, &hotel, &matrix, config).map(|m| (cluster, m))
            })
            .collect::<Result<Vec<_>>>()?;

        let solver = &self.solver;
        let days = models
            .into_par_iter()
            .map(|(cluster, model)| solve_day(cluster, model, solver, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Plan {
            hotel,
            lodging,
            largest_cluster: clustering.largest_cluster,
            days,
        })
    }

    fn place_hotel(&self, anchor: Coordinate) -> Result<(Hotel, Vec<PlaceCandidate>)> {
        let Some(search) = &self.lodging else {
            return Ok((Hotel::at(anchor, &self.config), Vec::new()));
        };

        info!("searching lodging near {:.5},{:.5}", anchor.lat, anchor.lng);
        let mut lodging = search.nearby_lodging(anchor, LODGING_RADIUS_M)?;
        lodging.sort_by(|a, b| b.prominence().total_cmp(&a.prominence()));
        let location = lodging.first().map(|top| top.location).unwrap_or(anchor);
        Ok((Hotel::at(location, &self.config), lodging))
    }
}

/// Solves one day's model and turns the result into a schedule.
pub fn solve_day<S>(cluster: &Cluster, model: RouteModel, solver: &S, config: &PlannerConfig) -> Result<DayPlan>
where
    S: MilpSolver + ?Sized,
{
    let day = model.day;
    info!(day = day + 1, cluster = cluster.id, pois = model.poi_count(), "planning day");

    let (status, assignment) = if model.poi_count() == 0 {
        (SolveStatus::Optimal, model.trivial_assignment())
    } else {
        let greedy = insertion::construct(&model);
        let incumbent = greedy.assignment(&model);
        let outcome = solver.solve(&model.program, Some(&incumbent), config.solver_time_limit);
        let status = match outcome.status {
            SolveStatus::Infeasible => return Err(PlannerError::SolverInfeasible { day }),
            SolveStatus::Error(message) => return Err(PlannerError::Solver { day, message }),
            status => status,
        };

        let floor = model.program.objective.evaluate(&incumbent);
        match outcome.assignment {
            Some(found) if model.program.objective.evaluate(&found) + 1e-6 >= floor => (status, found),
            Some(_) => {
                debug!(day = day + 1, "solver answer is worse than the greedy route, keeping the greedy route");
                (status, incumbent)
            }
            None => {
                warn!(
                    day = day + 1,
                    visits = greedy.visits().len(),
                    "no solver incumbent within the time limit, keeping the greedy route"
                );
                (status, incumbent)
            }
        }
    };

    let arcs = model.selected_arcs(&assignment);
    debug!(day = day + 1, ?arcs, "selected arcs");
    let path = reconstruct(day, &arcs, model.origin(), model.destination())?;
    check_visits(&model, &assignment, &path)?;

    let visits: Vec<ScheduledVisit> = path[1..path.len() - 1]
        .iter()
        .map(|&node| {
            let arrival = model.arrival(&assignment, node);
            ScheduledVisit {
                poi: model.nodes[node].poi.clone(),
                arrival,
                departure: arrival + model.dwell_time,
            }
        })
        .collect();
    let prominence: f64 = path[1..path.len() - 1].iter().map(|&node| model.nodes[node].prize).sum();
    let itinerary = Itinerary::new(
        day,
        visits.iter().map(|visit| (&visit.poi, visit.arrival)),
        model.dwell_time,
    );

    info!(day = day + 1, visits = visits.len(), prominence, ?status, "day planned");
    Ok(DayPlan {
        day,
        cluster_id: cluster.id,
        cluster_mean_prominence: cluster.mean_prominence,
        status,
        path: path.iter().map(|&node| model.nodes[node].poi.id.clone()).collect(),
        visits,
        prominence,
        itinerary,
    })
}

/// POI ids key the travel-time matrix, so they must be unique and distinct from the hotel's.
fn check_ids(pois: &[Poi]) -> Result<()> {
    let mut seen = HashSet::with_capacity(pois.len());
    for poi in pois {
        if poi.id.as_str() == HOTEL_ID {
            return Err(PlannerError::configuration(format!(
                "POI {} uses the reserved id {HOTEL_ID:?}",
                poi.name
            )));
        }
        if !seen.insert(&poi.id) {
            return Err(PlannerError::configuration(format!("duplicate POI id {}", poi.id)));
        }
    }
    Ok(())
}

/// The path interior must be exactly the POIs flagged as visited.
fn check_visits(model: &RouteModel, assignment: &Assignment, path: &[usize]) -> Result<()> {
    let mut on_path: Vec<usize> = path[1..path.len() - 1].to_vec();
    on_path.sort_unstable();
    let visited = model.visited(assignment);
    if on_path != visited {
        return Err(PlannerError::ReconstructionInvariant {
            day: model.day,
            message: format!("path visits {on_path:?} but visit flags are {visited:?}"),
        });
    }
    if visited.len() > model.max_visits {
        return Err(PlannerError::ReconstructionInvariant {
            day: model.day,
            message: format!("{} visits exceed the cap of {}", visited.len(), model.max_visits),
        });
    }
    Ok(())
}
