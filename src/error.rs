//! Crate-wide error type.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PlannerError {
    /// Invalid planner setup, reported before any clustering or solving.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A POI whose window can never hold a full dwell.
    #[error(
        "POI {name} ({poi_id}) is open {opening_time}..{closing_time}, shorter than the {dwell_time} minute dwell time"
    )]
    DataInconsistency {
        poi_id: String,
        name: String,
        opening_time: u32,
        closing_time: u32,
        dwell_time: f64,
    },

    /// The hotel-only route is always feasible, so this points at bad input or a model bug.
    #[error("day {day}: solver reported the route model infeasible")]
    SolverInfeasible { day: usize },

    #[error("day {day}: solver failed: {message}")]
    Solver { day: usize, message: String },

    #[error("day {day}: selected arcs do not form a single hotel-to-hotel path: {message}")]
    ReconstructionInvariant { day: usize, message: String },

    #[error("place not found: {0}")]
    NotFound(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Day index the error is attributed to, if any.
    pub fn day(&self) -> Option<usize> {
        match self {
            Self::SolverInfeasible { day }
            | Self::Solver { day, .. }
            | Self::ReconstructionInvariant { day, .. } => Some(*day),
            _ => None,
        }
    }
}
