//! Demand prediction — how many people per zone will need shelter.
//!
//! Each zone gets two intermediate scores in [0, 1]:
//! - **vulnerability**: elderly share, poverty share, hospital distance,
//!   incident history
//! - **hazard**: scenario severity, rain, wind, low elevation
//!
//! These combine with the disaster type, time of day and mobility into an
//! evacuation rate clamped to [0.05, 0.85]. Zone attributes are normalized
//! against the min/max of the zones in the same call, so scores are relative
//! to the catalog being planned, not absolute.

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;
use crate::zone::Zone;

/// Predicted evacuation demand for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandEstimate {
    pub zone_id: String,
    pub zone_name: String,
    /// People expected to need shelter.
    pub demand: u32,
    /// Fraction of the population evacuating, in [0.05, 0.85].
    pub evac_rate: f64,
    pub vulnerability: f64,
    pub hazard: f64,
}

/// Lowest and highest evacuation rate the model will predict.
pub const MIN_EVAC_RATE: f64 = 0.05;
pub const MAX_EVAC_RATE: f64 = 0.85;

/// Model weights.
mod weights {
    pub const ELDERLY: f64 = 0.33;
    pub const ELDERLY_CAP: f64 = 0.3;
    pub const POVERTY: f64 = 0.27;
    pub const POVERTY_CAP: f64 = 0.4;
    pub const HOSPITAL: f64 = 0.20;
    pub const INCIDENTS: f64 = 0.20;

    pub const SEVERITY: f64 = 0.35;
    pub const RAIN: f64 = 0.25;
    pub const WIND: f64 = 0.20;
    pub const ELEVATION: f64 = 0.20;

    pub const RATE_BASE: f64 = 0.22;
    pub const RATE_HAZARD: f64 = 0.58;
    pub const RATE_VULNERABILITY: f64 = 0.35;
}

/// Min/max of one zone attribute across the current call.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    lo: f64,
    hi: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Bounds {
                lo: f64::INFINITY,
                hi: f64::NEG_INFINITY,
            },
            |b, v| Bounds {
                lo: b.lo.min(v),
                hi: b.hi.max(v),
            },
        )
    }

    /// Position of `x` within the bounds, clamped to [0, 1]. A degenerate
    /// range (all zones equal) normalizes to 0.
    fn norm(&self, x: f64) -> f64 {
        let span = self.hi - self.lo;
        if span == 0.0 {
            return 0.0;
        }
        ((x - self.lo) / span).clamp(0.0, 1.0)
    }
}

/// Per-zone normalized attributes.
#[derive(Debug, Clone, Copy)]
struct ZoneSignals {
    /// Relative population. Not weighted into the rate; kept so the signal
    /// set matches the zone attributes the catalog normalizes.
    #[allow(dead_code)]
    population: f64,
    incidents: f64,
    /// Inverted: the lowest zone scores 1.
    low_elevation: f64,
    hospital_distance: f64,
}

/// Scenario-wide terms shared by every zone in a run.
#[derive(Debug, Clone, Copy)]
struct ScenarioTerms {
    base_type: f64,
    severity: f64,
    rain: f64,
    wind: f64,
    time: f64,
    mobility: f64,
}

impl ScenarioTerms {
    fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            base_type: scenario.disaster_type.base_factor(),
            severity: scenario.severity_fraction(),
            rain: scenario.rain_factor(),
            wind: scenario.wind_factor(),
            time: scenario.time_of_day.demand_factor(),
            mobility: scenario.mobility_factor(),
        }
    }
}

fn vulnerability(zone: &Zone, signals: &ZoneSignals) -> f64 {
    weights::ELDERLY * zone.elderly_pct.clamp(0.0, weights::ELDERLY_CAP)
        + weights::POVERTY * zone.poverty_pct.clamp(0.0, weights::POVERTY_CAP)
        + weights::HOSPITAL * signals.hospital_distance
        + weights::INCIDENTS * signals.incidents
}

fn hazard(terms: &ScenarioTerms, signals: &ZoneSignals) -> f64 {
    weights::SEVERITY * terms.severity
        + weights::RAIN * terms.rain
        + weights::WIND * terms.wind
        + weights::ELEVATION * signals.low_elevation
}

fn evac_rate(terms: &ScenarioTerms, hazard: f64, vulnerability: f64) -> f64 {
    (terms.base_type
        * (weights::RATE_BASE
            + weights::RATE_HAZARD * hazard
            + weights::RATE_VULNERABILITY * vulnerability)
        * terms.time
        * terms.mobility)
        .clamp(MIN_EVAC_RATE, MAX_EVAC_RATE)
}

/// Predict evacuation demand for every zone under `scenario`.
///
/// Returns one estimate per zone in input order. Pure and deterministic;
/// an empty zone list yields an empty result.
pub fn predict_demand(zones: &[Zone], scenario: &Scenario) -> Vec<DemandEstimate> {
    let pop = Bounds::of(zones.iter().map(|z| z.population as f64));
    let inc = Bounds::of(zones.iter().map(|z| z.past_incidents as f64));
    let elev = Bounds::of(zones.iter().map(|z| z.elevation_m));
    let hosp = Bounds::of(zones.iter().map(|z| z.hospital_km));

    let terms = ScenarioTerms::from_scenario(scenario);

    zones
        .iter()
        .map(|zone| {
            let signals = ZoneSignals {
                population: pop.norm(zone.population as f64),
                incidents: inc.norm(zone.past_incidents as f64),
                low_elevation: 1.0 - elev.norm(zone.elevation_m),
                hospital_distance: hosp.norm(zone.hospital_km),
            };

            let vulnerability = vulnerability(zone, &signals);
            let hazard = hazard(&terms, &signals);
            let evac_rate = evac_rate(&terms, hazard, vulnerability);
            let demand = (zone.population as f64 * evac_rate).round() as u32;

            DemandEstimate {
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                demand,
                evac_rate,
                vulnerability,
                hazard,
            }
        })
        .collect()
}

/// Total predicted demand across estimates.
pub fn total_demand(estimates: &[DemandEstimate]) -> u64 {
    estimates.iter().map(|d| d.demand as u64).sum()
}
