//! Multi-day sightseeing itinerary planner.
//!
//! POIs are clustered into one geographic group per day, and each day's
//! route is chosen by a prize-collecting TSP with time windows solved as a MILP.

pub mod acquisition;
pub mod clustering;
pub mod config;
pub mod error;
pub mod google;
pub mod haversine;
pub mod insertion;
pub mod itinerary;
pub mod lp;
pub mod matrix;
pub mod model;
pub mod nominatim;
pub mod osrm;
pub mod planner;
pub mod poi;
pub mod projection;
pub mod route;
pub mod solver;
pub mod traits;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use planner::{DayPlan, ItineraryPlanner, Plan};
pub use poi::{Coordinate, Hotel, Poi, PoiId};
