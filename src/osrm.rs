//! OSRM HTTP adapter for travel-time matrices.

use serde::Deserialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<f64>>> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(locations);
        debug!(locations = locations.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<OsrmTableResponse>()?;

        durations_to_minutes(body, locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

/// Converts an OSRM duration table (seconds) into a full minutes matrix.
fn durations_to_minutes(body: OsrmTableResponse, n: usize) -> Result<Vec<Vec<f64>>> {
    if body.code != "Ok" {
        return Err(PlannerError::upstream(format!(
            "OSRM returned {}: {}",
            body.code,
            body.message.unwrap_or_default()
        )));
    }

    let rows = body
        .durations
        .ok_or_else(|| PlannerError::upstream("OSRM response has no durations"))?;
    if rows.len() != n || rows.iter().any(|row| row.len() != n) {
        return Err(PlannerError::upstream(format!(
            "OSRM table is not {n}x{n}"
        )));
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .enumerate()
                .map(|(j, cell)| match cell {
                    Some(seconds) if seconds >= 0.0 => Ok(seconds / 60.0),
                    _ => Err(PlannerError::upstream(format!(
                        "OSRM has no route from location {i} to {j}"
                    ))),
                })
                .collect()
        })
        .collect()
}
