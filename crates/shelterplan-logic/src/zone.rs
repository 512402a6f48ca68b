//! Zone records — geographic catchment areas from the zone catalog.

use serde::{Deserialize, Serialize};

/// A geographic zone with population and vulnerability attributes.
///
/// Percentages are fractions and are not range-checked; the predictor clamps
/// what it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub population: u32,
    pub elderly_pct: f64,
    pub poverty_pct: f64,
    pub past_incidents: u32,
    pub elevation_m: f64,
    /// Distance to the nearest hospital.
    pub hospital_km: f64,
}
