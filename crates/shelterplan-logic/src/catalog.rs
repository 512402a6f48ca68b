//! Catalog loading — zones, shelters, and scenarios from JSON.
//!
//! The surrounding application owns the real catalogs. This module parses
//! whatever it hands over and ships a small demo catalog (five Chennai zones,
//! four shelters) for the harness and tests.

use serde::de::DeserializeOwned;

use crate::error::PlanError;
use crate::scenario::Scenario;
use crate::shelter::Shelter;
use crate::zone::Zone;

const ZONES_JSON: &str = include_str!("../../../data/zones.json");
const SHELTERS_JSON: &str = include_str!("../../../data/shelters.json");

fn parse<T: DeserializeOwned>(json: &str, what: &'static str) -> Result<T, PlanError> {
    serde_json::from_str(json).map_err(|source| PlanError::Parse { what, source })
}

/// Parse a JSON array of zones.
pub fn load_zones(json: &str) -> Result<Vec<Zone>, PlanError> {
    parse(json, "zones")
}

/// Parse a JSON array of shelters.
pub fn load_shelters(json: &str) -> Result<Vec<Shelter>, PlanError> {
    parse(json, "shelters")
}

/// Parse a single scenario object.
pub fn load_scenario(json: &str) -> Result<Scenario, PlanError> {
    parse(json, "scenario")
}

/// The built-in demo zone catalog.
pub fn builtin_zones() -> Result<Vec<Zone>, PlanError> {
    load_zones(ZONES_JSON)
}

/// The built-in demo shelter catalog.
pub fn builtin_shelters() -> Result<Vec<Shelter>, PlanError> {
    load_shelters(SHELTERS_JSON)
}
