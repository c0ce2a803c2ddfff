//! Human-readable day schedules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::poi::{Poi, PoiId};

const START_ARRIVAL: &str = "Have Breakfast";
const RETURN_DEPARTURE: &str = "Take Rest!";
const NO_TIME: &str = "-";

/// Formats minutes since midnight as `HH:MM`.
///
/// Minutes are rounded to the nearest integer and capped at 59 so that a
/// value such as 599.7 reads `09:59` rather than rolling over.
pub fn format_clock(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    let hours = (minutes / 60.0).floor();
    let rest = (minutes - hours * 60.0).round().min(59.0);
    format!("{:02}:{:02}", hours as u32, rest as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    Start,
    Visit,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub kind: StopKind,
    pub name: String,
    pub poi_id: Option<PoiId>,
    /// Minutes since midnight; absent for the fixed hotel records.
    pub arrival: Option<f64>,
    pub departure: Option<f64>,
}

impl Stop {
    pub fn arrival_label(&self) -> String {
        match (self.kind, self.arrival) {
            (StopKind::Start, _) => START_ARRIVAL.to_string(),
            (_, Some(minutes)) => format_clock(minutes),
            (_, None) => NO_TIME.to_string(),
        }
    }

    pub fn departure_label(&self) -> String {
        match (self.kind, self.departure) {
            (StopKind::Return, _) => RETURN_DEPARTURE.to_string(),
            (_, Some(minutes)) => format_clock(minutes),
            (_, None) => NO_TIME.to_string(),
        }
    }
}

/// One day's ordered stops, bracketed by the hotel records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub day: usize,
    pub stops: Vec<Stop>,
}

impl Itinerary {
    /// `visits` are the POIs in visiting order with their arrival times.
    pub fn new<'a>(day: usize, visits: impl IntoIterator<Item = (&'a Poi, f64)>, dwell_time: f64) -> Self {
        let mut stops = vec![Stop {
            kind: StopKind::Start,
            name: "Start at the hotel".to_string(),
            poi_id: None,
            arrival: None,
            departure: None,
        }];

        stops.extend(visits.into_iter().map(|(poi, arrival)| Stop {
            kind: StopKind::Visit,
            name: poi.name.clone(),
            poi_id: Some(poi.id.clone()),
            arrival: Some(arrival),
            departure: Some(arrival + dwell_time),
        }));

        stops.push(Stop {
            kind: StopKind::Return,
            name: "Arrive at the hotel".to_string(),
            poi_id: None,
            arrival: None,
            departure: None,
        });

        Self { day, stops }
    }

    /// Stops between the two hotel records.
    pub fn visits(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| stop.kind == StopKind::Visit)
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .stops
            .iter()
            .map(|stop| stop.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Point of Interest".len());

        writeln!(f, "Day {}", self.day + 1)?;
        writeln!(f, "{:<width$}  {:<14}  {:<10}", "Point of Interest", "Arrive at", "Depart at")?;
        for stop in &self.stops {
            writeln!(
                f,
                "{:<width$}  {:<14}  {:<10}",
                stop.name,
                stop.arrival_label(),
                stop.departure_label()
            )?;
        }
        Ok(())
    }
}
