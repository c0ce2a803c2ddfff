//! Prize-collecting TSP with time windows, one model per day.
//!
//! Node 0 is the hotel as origin, nodes `1..=n` are the cluster's POIs, and
//! node `n + 1` is a second copy of the hotel acting as destination. Splitting
//! the hotel turns the round trip into a single origin-to-destination path.
//!
//! Travel along arc `(i, j)` is linked to arrival times with a per-arc big-M
//! `max(closing_i + t_ij - opening_j, 0)`, which both enforces time windows and
//! rules out sub-tours since every hop moves the clock forward by the dwell time.

use tracing::debug;

use crate::clustering::Cluster;
use crate::config::{LAST_MINUTE, PlannerConfig};
use crate::error::{PlannerError, Result};
use crate::lp::{Assignment, Direction, LinearExpr, LinearProgram, Sense, VarId};
use crate::matrix::DistanceMatrix;
use crate::poi::{Hotel, Poi};

#[derive(Debug, Clone)]
pub struct RouteNode {
    pub poi: Poi,
    pub prize: f64,
    pub opening: f64,
    pub closing: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteArc {
    pub from: usize,
    pub to: usize,
    pub travel_time: f64,
    pub big_m: f64,
    pub var: VarId,
}

#[derive(Debug, Clone)]
pub struct RouteModel {
    pub day: usize,
    pub nodes: Vec<RouteNode>,
    pub arcs: Vec<RouteArc>,
    /// `visit_vars[k]` belongs to node `k + 1`.
    pub visit_vars: Vec<VarId>,
    /// One arrival time per node, origin and destination included.
    pub arrival_vars: Vec<VarId>,
    pub dwell_time: f64,
    pub max_visits: usize,
    pub program: LinearProgram,
}

impl RouteModel {
    /// Builds the day model for `cluster`.
    ///
    /// Fails with `DataInconsistency` for the first member whose window is
    /// shorter than the dwell time.
    pub fn build(
        day: usize,
        cluster: &Cluster,
        hotel: &Hotel,
        matrix: &DistanceMatrix,
        config: &PlannerConfig,
    ) -> Result<Self> {
        check_windows(&cluster.members, config.dwell_time)?;

        let dwell = config.dwell_time;
        let n = cluster.members.len();
        let origin = 0;
        let destination = n + 1;

        let mut nodes = Vec::with_capacity(n + 2);
        nodes.push(RouteNode::hotel(hotel));
        nodes.extend(cluster.members.iter().map(RouteNode::poi));
        nodes.push(RouteNode::hotel(hotel));

        let mut program = LinearProgram::new(Direction::Maximize);

        let visit_vars: Vec<VarId> = (1..=n).map(|i| program.binary(format!("visit_{i}"))).collect();
        let arrival_vars: Vec<VarId> = (0..=destination)
            .map(|i| program.continuous(format!("arrival_{i}"), Some(0.0), Some(f64::from(LAST_MINUTE))))
            .collect();

        let mut arcs = Vec::new();
        for from in origin..=n {
            for to in 1..=destination {
                if from == to {
                    continue;
                }
                let travel_time = matrix.travel_time(&nodes[from].poi.id, &nodes[to].poi.id)?;
                let big_m = (nodes[from].closing + travel_time - nodes[to].opening).max(0.0);
                let var = program.binary(format!("arc_{from}_{to}"));
                arcs.push(RouteArc {
                    from,
                    to,
                    travel_time,
                    big_m,
                    var,
                });
            }
        }

        program.objective = LinearExpr {
            terms: (1..=n).map(|i| (visit_vars[i - 1], nodes[i].prize)).collect(),
            constant: 0.0,
        };

        for i in 1..=n {
            let out = LinearExpr::sum(arcs.iter().filter(|a| a.from == i).map(|a| a.var))
                .term(visit_vars[i - 1], -1.0);
            program.constrain(format!("out_degree_{i}"), out, Sense::Equal, 0.0);

            let inbound = LinearExpr::sum(arcs.iter().filter(|a| a.to == i).map(|a| a.var))
                .term(visit_vars[i - 1], -1.0);
            program.constrain(format!("in_degree_{i}"), inbound, Sense::Equal, 0.0);
        }

        program.constrain(
            "leave_origin",
            LinearExpr::sum(arcs.iter().filter(|a| a.from == origin).map(|a| a.var)),
            Sense::Equal,
            1.0,
        );
        program.constrain(
            "enter_destination",
            LinearExpr::sum(arcs.iter().filter(|a| a.to == destination).map(|a| a.var)),
            Sense::Equal,
            1.0,
        );

        // arrival_i + dwell + t_ij - arrival_j <= M_ij (1 - arc_ij)
        for arc in &arcs {
            let lhs = LinearExpr::new()
                .term(arrival_vars[arc.from], 1.0)
                .term(arrival_vars[arc.to], -1.0)
                .term(arc.var, arc.big_m);
            program.constrain(
                format!("time_{}_{}", arc.from, arc.to),
                lhs,
                Sense::LessEq,
                arc.big_m - dwell - arc.travel_time,
            );
        }

        for (i, node) in nodes.iter().enumerate() {
            program.constrain(
                format!("opens_{i}"),
                LinearExpr::new().term(arrival_vars[i], 1.0),
                Sense::GreaterEq,
                node.opening,
            );
            program.constrain(
                format!("closes_{i}"),
                LinearExpr::new().term(arrival_vars[i], 1.0),
                Sense::LessEq,
                node.closing - dwell,
            );
        }

        program.constrain(
            "visit_cap",
            LinearExpr::sum(visit_vars.iter().copied()),
            Sense::LessEq,
            config.max_visits_per_day as f64,
        );

        debug!(
            day,
            pois = n,
            variables = program.variables.len(),
            constraints = program.constraints.len(),
            "built route model"
        );

        Ok(Self {
            day,
            nodes,
            arcs,
            visit_vars,
            arrival_vars,
            dwell_time: dwell,
            max_visits: config.max_visits_per_day,
            program,
        })
    }

    pub fn origin(&self) -> usize {
        0
    }

    pub fn destination(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn poi_count(&self) -> usize {
        self.nodes.len() - 2
    }

    pub fn arc(&self, from: usize, to: usize) -> Option<&RouteArc> {
        self.arcs.iter().find(|a| a.from == from && a.to == to)
    }

    /// Arcs set in `assignment`, as (from, to) node pairs.
    pub fn selected_arcs(&self, assignment: &Assignment) -> Vec<(usize, usize)> {
        self.arcs
            .iter()
            .filter(|a| assignment.is_set(a.var))
            .map(|a| (a.from, a.to))
            .collect()
    }

    /// POI nodes whose visit indicator is set.
    pub fn visited(&self, assignment: &Assignment) -> Vec<usize> {
        self.visit_vars
            .iter()
            .enumerate()
            .filter(|(_, var)| assignment.is_set(**var))
            .map(|(k, _)| k + 1)
            .collect()
    }

    pub fn arrival(&self, assignment: &Assignment, node: usize) -> f64 {
        assignment.value(self.arrival_vars[node])
    }

    /// Assignment of the hotel-only route: one arc from origin to destination.
    pub fn trivial_assignment(&self) -> Assignment {
        let start = self.nodes[self.origin()].opening;
        self.route_assignment(&[self.origin(), self.destination()], &[start, start + self.dwell_time])
    }

    /// Assignment that follows `route` with the given arrival per route position.
    ///
    /// Nodes off the route keep their opening time as arrival, which satisfies
    /// every time constraint on an unused arc.
    pub fn route_assignment(&self, route: &[usize], arrivals: &[f64]) -> Assignment {
        let mut values = vec![0.0; self.program.variables.len()];
        for (node, var) in self.nodes.iter().zip(&self.arrival_vars) {
            values[var.0] = node.opening;
        }
        for (&node, &arrival) in route.iter().zip(arrivals) {
            values[self.arrival_vars[node].0] = arrival;
            if node != self.origin() && node != self.destination() {
                values[self.visit_vars[node - 1].0] = 1.0;
            }
        }
        for pair in route.windows(2) {
            if let Some(arc) = self.arc(pair[0], pair[1]) {
                values[arc.var.0] = 1.0;
            }
        }
        Assignment::new(values)
    }
}

impl RouteNode {
    fn hotel(hotel: &Hotel) -> Self {
        let poi = hotel.as_poi().clone();
        Self {
            prize: 0.0,
            opening: f64::from(poi.opening_time),
            closing: f64::from(poi.closing_time),
            poi,
        }
    }

    fn poi(poi: &Poi) -> Self {
        Self {
            prize: poi.prominence(),
            opening: f64::from(poi.opening_time),
            closing: f64::from(poi.closing_time),
            poi: poi.clone(),
        }
    }
}

/// Every POI must be open at least as long as one dwell.
pub fn check_windows(pois: &[Poi], dwell_time: f64) -> Result<()> {
    match pois.iter().find(|poi| f64::from(poi.window_len()) < dwell_time) {
        Some(poi) => Err(PlannerError::DataInconsistency {
            poi_id: poi.id.to_string(),
            name: poi.name.clone(),
            opening_time: poi.opening_time,
            closing_time: poi.closing_time,
            dwell_time,
        }),
        None => Ok(()),
    }
}
