//! Google Places adapter for sightseeing candidates, opening hours and lodging.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::poi::{Coordinate, OpeningHours, PlaceCandidate};
use crate::traits::{HotelSearch, PlaceDetails, PlaceSearch};

const DEFAULT_RATING: f64 = 3.0;
const DEFAULT_REVIEW_COUNT: u32 = 100;
const DEFAULT_NAME: &str = "Name not Available!";

#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    pub api_key: String,
    pub base_url: String,
    /// Each page holds up to 20 results.
    pub max_pages: usize,
    /// A fresh `next_page_token` is rejected until a short delay has passed.
    pub page_delay: Duration,
    pub timeout_secs: u64,
}

impl GooglePlacesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            max_pages: 2,
            page_delay: Duration::from_secs(2),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    config: GooglePlacesConfig,
    client: reqwest::blocking::Client,
}

impl GooglePlacesClient {
    pub fn new(config: GooglePlacesConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn nearby_page(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: &str,
        page_token: Option<&str>,
    ) -> Result<NearbyResponse> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();
        let mut query = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", category),
            ("rankby", "prominence"),
            ("key", self.config.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pagetoken", token));
        }

        let response = self
            .client
            .get(format!("{}/nearbysearch/json", self.config.base_url))
            .query(&query)
            .send()?
            .error_for_status()?
            .json::<NearbyResponse>()?;
        check_status(&response.status, response.error_message.as_deref())?;
        Ok(response)
    }
}

impl PlaceSearch for GooglePlacesClient {
    fn nearby(&self, center: Coordinate, radius_m: u32, category: &str) -> Result<Vec<PlaceCandidate>> {
        let mut candidates = Vec::new();
        let mut token: Option<String> = None;

        for page in 0..self.config.max_pages.max(1) {
            if token.is_some() {
                std::thread::sleep(self.config.page_delay);
            }
            let response = self.nearby_page(center, radius_m, category, token.as_deref())?;
            debug!(page, results = response.results.len(), category, "nearby search page");
            candidates.extend(response.results.into_iter().filter_map(PlaceResult::into_candidate));

            match response.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        info!(count = candidates.len(), category, "place search finished");
        Ok(candidates)
    }
}

impl PlaceDetails for GooglePlacesClient {
    fn details(&self, place_id: &str) -> Result<Option<OpeningHours>> {
        let response = self
            .client
            .get(format!("{}/details/json", self.config.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", "opening_hours"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json::<DetailsResponse>()?;
        check_status(&response.status, response.error_message.as_deref())?;

        Ok(response.result.and_then(|r| r.opening_hours).and_then(first_period))
    }
}

impl HotelSearch for GooglePlacesClient {
    fn nearby_lodging(&self, center: Coordinate, radius_m: u32) -> Result<Vec<PlaceCandidate>> {
        let mut lodging = self
            .nearby_page(center, radius_m, "lodging", None)?
            .results
            .into_iter()
            .filter_map(PlaceResult::into_candidate)
            .collect::<Vec<_>>();
        lodging.sort_by(|a, b| b.prominence().total_cmp(&a.prominence()));
        Ok(lodging)
    }
}

fn check_status(status: &str, message: Option<&str>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "NOT_FOUND" => Err(PlannerError::NotFound(message.unwrap_or(status).to_string())),
        other => Err(PlannerError::upstream(format!(
            "Places API returned {other}: {}",
            message.unwrap_or_default()
        ))),
    }
}

/// `"0930"` -> 570.
fn parse_hhmm(time: &str) -> Option<u32> {
    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = time[0..2].parse().ok()?;
    let minutes: u32 = time[2..4].parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Only the first period is used, matching a single daily window.
fn first_period(hours: OpeningHoursPayload) -> Option<OpeningHours> {
    let period = hours.periods?.into_iter().next()?;
    let opening_time = parse_hhmm(&period.open?.time)?;
    let closing_time = parse_hhmm(&period.close?.time)?;
    Some(OpeningHours {
        opening_time,
        closing_time,
    })
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: Option<String>,
    name: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    geometry: Option<Geometry>,
    vicinity: Option<String>,
}

impl PlaceResult {
    /// Results without an id or a location cannot be routed and are skipped.
    fn into_candidate(self) -> Option<PlaceCandidate> {
        let location = self.geometry?.location;
        Some(PlaceCandidate {
            place_id: self.place_id?,
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            rating: self.rating.unwrap_or(DEFAULT_RATING),
            review_count: self.user_ratings_total.unwrap_or(DEFAULT_REVIEW_COUNT),
            location: Coordinate::new(location.lat, location.lng),
            address: self.vicinity,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    opening_hours: Option<OpeningHoursPayload>,
}

#[derive(Debug, Deserialize)]
struct OpeningHoursPayload {
    periods: Option<Vec<Period>>,
}

#[derive(Debug, Deserialize)]
struct Period {
    open: Option<PeriodTime>,
    close: Option<PeriodTime>,
}

#[derive(Debug, Deserialize)]
struct PeriodTime {
    time: String,
}
