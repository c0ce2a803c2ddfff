//! Greedy day route used as the solver's first incumbent.
//!
//! POIs are inserted in order of decreasing prize, each at the cheapest
//! position that keeps every window, then the route is tightened with 2-opt.
//! The result is always feasible for the day's [`RouteModel`], so a solve that
//! runs out of time still has a route to report.

use tracing::debug;

use crate::lp::Assignment;
use crate::model::RouteModel;

/// A feasible route from origin to destination with its earliest schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyRoute {
    pub route: Vec<usize>,
    /// Arrival per route position.
    pub arrivals: Vec<f64>,
    pub travel_time: f64,
}

impl GreedyRoute {
    pub fn visits(&self) -> &[usize] {
        &self.route[1..self.route.len() - 1]
    }

    pub fn assignment(&self, model: &RouteModel) -> Assignment {
        model.route_assignment(&self.route, &self.arrivals)
    }
}

/// Earliest arrivals along `route`, or `None` when a window is missed.
///
/// Returns the arrivals per position and the total travel time.
pub fn schedule(model: &RouteModel, route: &[usize]) -> Option<(Vec<f64>, f64)> {
    let dwell = model.dwell_time;
    let mut arrivals = Vec::with_capacity(route.len());
    let mut travel_time = 0.0;
    let mut previous: Option<(usize, f64)> = None;

    for &node in route {
        let window = &model.nodes[node];
        let arrival = match previous {
            None => window.opening,
            Some((from, at)) => {
                let travel = model.arc(from, node)?.travel_time;
                travel_time += travel;
                (at + dwell + travel).max(window.opening)
            }
        };
        if arrival > window.closing - dwell {
            return None;
        }
        arrivals.push(arrival);
        previous = Some((node, arrival));
    }

    Some((arrivals, travel_time))
}

/// Builds the greedy route for `model`.
pub fn construct(model: &RouteModel) -> GreedyRoute {
    let mut route = vec![model.origin(), model.destination()];
    let (mut arrivals, mut travel_time) = match schedule(model, &route) {
        Some(scheduled) => scheduled,
        None => {
            let start = model.nodes[model.origin()].opening;
            (vec![start, start + model.dwell_time], 0.0)
        }
    };

    let mut candidates: Vec<usize> = (1..=model.poi_count()).collect();
    candidates.sort_by(|a, b| {
        model.nodes[*b]
            .prize
            .total_cmp(&model.nodes[*a].prize)
            .then(a.cmp(b))
    });

    // A later insertion or 2-opt move can open room for a POI skipped earlier.
    let mut inserted = true;
    while inserted && route.len() - 2 < model.max_visits {
        inserted = false;
        for &node in &candidates {
            if route.contains(&node) {
                continue;
            }
            if let Some((position, scheduled)) = cheapest_insertion(model, &route, node) {
                route.insert(position, node);
                (arrivals, travel_time) = scheduled;
                two_opt(model, &mut route, &mut arrivals, &mut travel_time);
                inserted = true;
                break;
            }
        }
    }

    debug!(day = model.day, visits = route.len() - 2, travel_time, "greedy route built");
    GreedyRoute {
        route,
        arrivals,
        travel_time,
    }
}

fn cheapest_insertion(model: &RouteModel, route: &[usize], node: usize) -> Option<(usize, (Vec<f64>, f64))> {
    let mut best: Option<(usize, (Vec<f64>, f64))> = None;
    for position in 1..route.len() {
        let mut candidate = route.to_vec();
        candidate.insert(position, node);
        if let Some(scheduled) = schedule(model, &candidate) {
            if best.as_ref().is_none_or(|(_, (_, cost))| scheduled.1 < *cost) {
                best = Some((position, scheduled));
            }
        }
    }
    best
}

/// Reverses interior segments while that shortens travel and keeps every window.
fn two_opt(model: &RouteModel, route: &mut [usize], arrivals: &mut Vec<f64>, travel_time: &mut f64) {
    let last = route.len() - 1;
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..last {
            for j in i + 1..last {
                route[i..=j].reverse();
                match schedule(model, route) {
                    Some((scheduled, cost)) if cost + 1e-9 < *travel_time => {
                        *arrivals = scheduled;
                        *travel_time = cost;
                        improved = true;
                    }
                    _ => route[i..=j].reverse(),
                }
            }
        }
    }
}
