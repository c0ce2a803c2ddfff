//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data including:
//! - Real Chicago attractions (coordinates from OpenStreetMap)
//! - Builders for POIs and mock collaborators

#![allow(dead_code)]

pub mod chicago_locations;
pub mod mocks;

pub use chicago_locations::*;
pub use mocks::*;
