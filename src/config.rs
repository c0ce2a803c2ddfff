//! Planner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Last minute of the day.
pub const LAST_MINUTE: u32 = 1439;

/// Immutable settings shared by every stage of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of day clusters.
    pub days: usize,
    /// Search radius handed to place search, in meters.
    pub max_coverage_radius_m: u32,
    /// Window applied to POIs without known opening hours (minutes since midnight).
    pub default_opening_time: u32,
    pub default_closing_time: u32,
    /// Hotel window; the route starts and ends inside it.
    pub hotel_opening_time: u32,
    pub hotel_closing_time: u32,
    /// Minutes spent at every node of a route.
    pub dwell_time: f64,
    pub max_visits_per_day: usize,
    /// Wall-clock budget for one day's solve.
    pub solver_time_limit: Duration,
    /// Seed for k-means++ initialisation.
    pub cluster_seed: u64,
    pub cluster_max_iterations: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            days: 3,
            max_coverage_radius_m: 50_000,
            default_opening_time: 8 * 60,
            default_closing_time: 19 * 60,
            hotel_opening_time: 8 * 60,
            hotel_closing_time: 21 * 60 + 30,
            dwell_time: 90.0,
            max_visits_per_day: 7,
            solver_time_limit: Duration::from_secs(99),
            cluster_seed: 42,
            cluster_max_iterations: 100,
        }
    }
}

impl PlannerConfig {
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_dwell_time(mut self, minutes: f64) -> Self {
        self.dwell_time = minutes;
        self
    }

    pub fn with_max_visits_per_day(mut self, visits: usize) -> Self {
        self.max_visits_per_day = visits;
        self
    }

    pub fn with_default_window(mut self, opening: u32, closing: u32) -> Self {
        self.default_opening_time = opening;
        self.default_closing_time = closing;
        self
    }

    pub fn with_hotel_window(mut self, opening: u32, closing: u32) -> Self {
        self.hotel_opening_time = opening;
        self.hotel_closing_time = closing;
        self
    }

    pub fn with_solver_time_limit(mut self, limit: Duration) -> Self {
        self.solver_time_limit = limit;
        self
    }

    /// Rejects settings no plan can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(PlannerError::configuration("days must be at least 1"));
        }
        check_window("default", self.default_opening_time, self.default_closing_time)?;
        check_window("hotel", self.hotel_opening_time, self.hotel_closing_time)?;
        if !(self.dwell_time > 0.0) || !self.dwell_time.is_finite() {
            return Err(PlannerError::configuration(format!(
                "dwell time must be positive, got {}",
                self.dwell_time
            )));
        }
        // The hotel is visited twice a day, once leaving and once returning.
        let hotel_window = f64::from(self.hotel_closing_time - self.hotel_opening_time);
        if hotel_window < 2.0 * self.dwell_time {
            return Err(PlannerError::configuration(format!(
                "hotel window {}..{} cannot hold two {} minute dwells",
                self.hotel_opening_time, self.hotel_closing_time, self.dwell_time
            )));
        }
        if self.max_visits_per_day == 0 {
            return Err(PlannerError::configuration(
                "max visits per day must be at least 1",
            ));
        }
        if self.solver_time_limit.is_zero() {
            return Err(PlannerError::configuration(
                "solver time limit must be positive",
            ));
        }
        Ok(())
    }
}

fn check_window(label: &str, opening: u32, closing: u32) -> Result<()> {
    if closing <= opening {
        return Err(PlannerError::configuration(format!(
            "{label} closing time {closing} must be after opening time {opening}"
        )));
    }
    if closing > LAST_MINUTE {
        return Err(PlannerError::configuration(format!(
            "{label} closing time {closing} is past the end of the day"
        )));
    }
    Ok(())
}
