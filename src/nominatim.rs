//! Nominatim (OpenStreetMap) geocoder.

use serde::Deserialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::poi::Coordinate;
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("itinerary-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, place_name: &str) -> Result<Coordinate> {
        let hits = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[("q", place_name), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json::<Vec<SearchHit>>()?;

        let coordinate = first_hit(place_name, hits)?;
        debug!(place_name, lat = coordinate.lat, lng = coordinate.lng, "geocoded");
        Ok(coordinate)
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Nominatim encodes coordinates as strings.
fn first_hit(place_name: &str, hits: Vec<SearchHit>) -> Result<Coordinate> {
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::NotFound(place_name.to_string()))?;
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| PlannerError::upstream(format!("bad latitude {:?}", hit.lat)))?;
    let lng = hit
        .lon
        .parse::<f64>()
        .map_err(|_| PlannerError::upstream(format!("bad longitude {:?}", hit.lon)))?;
    Ok(Coordinate::new(lat, lng))
}
