//! Building the POI set from collaborator services or an offline file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::poi::{Coordinate, OpeningHours, PlaceCandidate, Poi};
use crate::traits::{Geocoder, PlaceDetails, PlaceSearch};

/// Category searched for sightseeing candidates.
pub const ATTRACTION_CATEGORY: &str = "tourist_attraction";

/// Geocoded pin plus the ingested POIs around it.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub reference: Coordinate,
    pub pois: Vec<Poi>,
}

/// Geocode `place_name`, search attractions around it and look up their hours.
pub fn acquire_pois<G, S, D>(
    geocoder: &G,
    search: &S,
    details: &D,
    place_name: &str,
    config: &PlannerConfig,
) -> Result<Acquired>
where
    G: Geocoder + ?Sized,
    S: PlaceSearch + ?Sized,
    D: PlaceDetails + ?Sized,
{
    let reference = geocoder.resolve(place_name)?;
    info!(place_name, lat = reference.lat, lng = reference.lng, "looking for places");

    let candidates = search.nearby(reference, config.max_coverage_radius_m, ATTRACTION_CATEGORY)?;
    info!(count = candidates.len(), "looking up operating hours");

    let pois = candidates
        .into_iter()
        .map(|candidate| {
            let hours = details.details(&candidate.place_id)?;
            Poi::ingest(candidate, hours, config)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Acquired { reference, pois })
}

/// One row of an offline places file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place_id: String,
    pub name: String,
    pub rating: f64,
    pub user_ratings_total: u32,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub opening_time: Option<u32>,
    #[serde(default)]
    pub closing_time: Option<u32>,
}

impl PlaceRecord {
    /// Missing times take the configured defaults one side at a time.
    pub fn into_poi(self, config: &PlannerConfig) -> Result<Poi> {
        let hours = match (self.opening_time, self.closing_time) {
            (None, None) => None,
            (opening, closing) => Some(OpeningHours {
                opening_time: opening.unwrap_or(config.default_opening_time),
                closing_time: closing.unwrap_or(config.default_closing_time),
            }),
        };
        let candidate = PlaceCandidate {
            place_id: self.place_id,
            name: self.name,
            rating: self.rating,
            review_count: self.user_ratings_total,
            location: Coordinate::new(self.lat, self.lng),
            address: None,
        };
        Poi::ingest(candidate, hours, config)
    }
}

/// Reads a JSON array of [`PlaceRecord`]s and ingests each one.
pub fn load_places(path: impl AsRef<Path>, config: &PlannerConfig) -> Result<Vec<Poi>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let records: Vec<PlaceRecord> = serde_json::from_reader(reader)?;
    info!(count = records.len(), path = %path.as_ref().display(), "loaded places file");
    records.into_iter().map(|record| record.into_poi(config)).collect()
}
