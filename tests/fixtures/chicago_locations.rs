//! Real Chicago attractions for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Ratings and review counts are
//! representative, not live data.

use itinerary_planner::{Coordinate, PlannerConfig, Poi};
use itinerary_planner::poi::{OpeningHours, PlaceCandidate};

/// A named attraction with coordinates and popularity.
#[derive(Debug, Clone)]
pub struct Attraction {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    pub reviews: u32,
    /// (opening, closing) in minutes since midnight; `None` means unknown.
    pub hours: Option<(u32, u32)>,
}

impl Attraction {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        lat: f64,
        lng: f64,
        rating: f64,
        reviews: u32,
        hours: Option<(u32, u32)>,
    ) -> Self {
        Self { id, name, lat, lng, rating, reviews, hours }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn candidate(&self) -> PlaceCandidate {
        PlaceCandidate {
            place_id: self.id.to_string(),
            name: self.name.to_string(),
            rating: self.rating,
            review_count: self.reviews,
            location: self.coords(),
            address: None,
        }
    }

    pub fn opening_hours(&self) -> Option<OpeningHours> {
        self.hours.map(|(opening_time, closing_time)| OpeningHours { opening_time, closing_time })
    }

    pub fn to_poi(&self, config: &PlannerConfig) -> Poi {
        Poi::ingest(self.candidate(), self.opening_hours(), config).expect("valid fixture")
    }
}

/// City-center pin used as the projection reference.
pub const LOOP_PIN: Coordinate = Coordinate::new(41.8781, -87.6298);

// ============================================================================
// Museum Campus / Grant Park (south-east of the Loop)
// ============================================================================

pub const MUSEUM_CAMPUS: &[Attraction] = &[
    Attraction::new("field", "Field Museum", 41.8663, -87.6170, 4.7, 21000, Some((540, 1020))),
    Attraction::new("shedd", "Shedd Aquarium", 41.8676, -87.6140, 4.6, 30000, Some((540, 1020))),
    Attraction::new("adler", "Adler Planetarium", 41.8663, -87.6068, 4.5, 9000, Some((570, 960))),
    Attraction::new("buckingham", "Buckingham Fountain", 41.8758, -87.6189, 4.6, 12000, None),
];

// ============================================================================
// Near North / Streeterville
// ============================================================================

pub const NEAR_NORTH: &[Attraction] = &[
    Attraction::new("navy_pier", "Navy Pier", 41.8917, -87.6086, 4.5, 80000, Some((600, 1320))),
    Attraction::new("hancock", "360 Chicago", 41.8988, -87.6229, 4.6, 11000, Some((540, 1380))),
    Attraction::new("water_tower", "Chicago Water Tower", 41.8972, -87.6245, 4.6, 6000, None),
];

// ============================================================================
// Lincoln Park (north)
// ============================================================================

pub const LINCOLN_PARK: &[Attraction] = &[
    Attraction::new("zoo", "Lincoln Park Zoo", 41.9211, -87.6340, 4.7, 25000, Some((600, 1020))),
    Attraction::new("conservatory", "Lincoln Park Conservatory", 41.9244, -87.6355, 4.7, 4000, Some((600, 1020))),
];

// ============================================================================
// The Loop and the riverfront: one day's worth of candidates from a single search
// ============================================================================

pub const DOWNTOWN: &[Attraction] = &[
    Attraction::new("cloud_gate", "Cloud Gate", 41.8827, -87.6233, 4.8, 52000, None),
    Attraction::new("art_institute", "Art Institute of Chicago", 41.8796, -87.6237, 4.8, 38000, Some((660, 1020))),
    Attraction::new("crown_fountain", "Crown Fountain", 41.8815, -87.6237, 4.7, 9000, None),
    Attraction::new("pritzker", "Jay Pritzker Pavilion", 41.8830, -87.6218, 4.7, 7000, None),
    Attraction::new("maggie_daley", "Maggie Daley Park", 41.8826, -87.6189, 4.7, 8000, Some((360, 1380))),
    Attraction::new("lurie", "Lurie Garden", 41.8814, -87.6212, 4.8, 2500, Some((360, 1260))),
    Attraction::new("riverwalk", "Chicago Riverwalk", 41.8880, -87.6240, 4.7, 15000, None),
    Attraction::new("skydeck", "Skydeck Chicago", 41.8789, -87.6359, 4.5, 40000, Some((540, 1200))),
    Attraction::new("cultural_center", "Chicago Cultural Center", 41.8838, -87.6250, 4.7, 5000, Some((600, 1020))),
    Attraction::new("wrigley", "Wrigley Building", 41.8893, -87.6248, 4.7, 3000, None),
    Attraction::new("tribune", "Tribune Tower", 41.8904, -87.6236, 4.6, 2000, None),
    Attraction::new("field_building", "The Rookery", 41.8790, -87.6320, 4.7, 1200, Some((540, 1020))),
    Attraction::new("chicago_theatre", "The Chicago Theatre", 41.8855, -87.6272, 4.7, 11000, Some((600, 1380))),
    Attraction::new("union_station", "Union Station Great Hall", 41.8786, -87.6403, 4.5, 9000, Some((360, 1380))),
];

pub fn downtown_pois(config: &PlannerConfig) -> Vec<Poi> {
    DOWNTOWN.iter().map(|a| a.to_poi(config)).collect()
}

pub fn all_attractions() -> Vec<&'static Attraction> {
    MUSEUM_CAMPUS
        .iter()
        .chain(NEAR_NORTH)
        .chain(LINCOLN_PARK)
        .collect()
}

pub fn all_pois(config: &PlannerConfig) -> Vec<Poi> {
    all_attractions().into_iter().map(|a| a.to_poi(config)).collect()
}
