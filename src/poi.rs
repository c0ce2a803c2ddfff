//! Points of interest, the hotel, and ingestion of raw place candidates.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LAST_MINUTE, PlannerConfig};
use crate::error::{PlannerError, Result};

/// Identifier reserved for the hotel node.
pub const HOTEL_ID: &str = "hotel";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoiId(pub String);

impl PoiId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// (lat, lng) tuple as consumed by matrix providers.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub name: String,
    pub location: Coordinate,
    /// Rating on a 0-5 scale.
    pub rating: f64,
    pub review_count: u32,
    /// Minutes since midnight.
    pub opening_time: u32,
    pub closing_time: u32,
    /// Day cluster, set once clustering has run.
    pub cluster: Option<usize>,
}

impl Poi {
    /// Builds a POI from an already-resolved window.
    ///
    /// Only the ordering invariant `opening <= closing <= 1439` is checked here;
    /// use [`Poi::ingest`] for raw service data.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Coordinate,
        rating: f64,
        review_count: u32,
        opening_time: u32,
        closing_time: u32,
    ) -> Result<Self> {
        if opening_time > closing_time || closing_time > LAST_MINUTE {
            return Err(PlannerError::configuration(format!(
                "invalid window {opening_time}..{closing_time}"
            )));
        }
        if !(0.0..=5.0).contains(&rating) {
            return Err(PlannerError::configuration(format!(
                "rating {rating} outside 0..=5"
            )));
        }
        Ok(Self {
            id: PoiId::new(id),
            name: name.into(),
            location,
            rating,
            review_count,
            opening_time,
            closing_time,
            cluster: None,
        })
    }

    /// Turns a search candidate and its optional opening hours into a POI.
    ///
    /// Missing hours fall back to the configured default window. The closing
    /// time is clamped upward to the default closing time and to the opening
    /// time, which can make a POI look open later than it really is.
    pub fn ingest(
        candidate: PlaceCandidate,
        hours: Option<OpeningHours>,
        config: &PlannerConfig,
    ) -> Result<Self> {
        let (opening, closing) = match hours {
            Some(hours) => (hours.opening_time, hours.closing_time),
            None => (config.default_opening_time, config.default_closing_time),
        };
        let opening = opening.min(LAST_MINUTE);
        let clamped = closing.max(config.default_closing_time).max(opening).min(LAST_MINUTE);
        if clamped != closing {
            debug!(
                place = %candidate.place_id,
                reported = closing,
                clamped,
                "closing time widened during ingestion"
            );
        }

        Self::new(
            candidate.place_id,
            candidate.name,
            candidate.location,
            candidate.rating.clamp(0.0, 5.0),
            candidate.review_count,
            opening,
            clamped,
        )
    }

    /// Desirability score, always derived from the current rating and review count.
    pub fn prominence(&self) -> f64 {
        self.rating * f64::from(self.review_count)
    }

    pub fn window_len(&self) -> u32 {
        self.closing_time - self.opening_time
    }
}

/// The shared start and end point of every day's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    poi: Poi,
}

impl Hotel {
    pub fn at(location: Coordinate, config: &PlannerConfig) -> Self {
        Self {
            poi: Poi {
                id: PoiId::new(HOTEL_ID),
                name: HOTEL_ID.to_string(),
                location,
                rating: 0.0,
                review_count: 0,
                opening_time: config.hotel_opening_time,
                closing_time: config.hotel_closing_time,
                cluster: None,
            },
        }
    }

    pub fn as_poi(&self) -> &Poi {
        &self.poi
    }

    pub fn id(&self) -> &PoiId {
        &self.poi.id
    }

    pub fn location(&self) -> Coordinate {
        self.poi.location
    }
}

/// Raw result of a nearby-place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub name: String,
    pub rating: f64,
    pub review_count: u32,
    pub location: Coordinate,
    /// Free-form address, only reported for lodging.
    #[serde(default)]
    pub address: Option<String>,
}

impl PlaceCandidate {
    pub fn prominence(&self) -> f64 {
        self.rating * f64::from(self.review_count)
    }
}

/// Opening window reported by place details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub opening_time: u32,
    pub closing_time: u32,
}
