//! Scenario parameters — the disaster event driving one planning run.
//!
//! A `Scenario` is built fresh from the planner's sliders and selectors on
//! every run. It feeds both the demand predictor (hazard terms) and the cost
//! model (travel speed, congestion, mobility).

use serde::{Deserialize, Serialize};

// ============================================================================
// DISASTER TYPE
// ============================================================================

/// Kind of disaster being planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisasterType {
    Flood,
    Cyclone,
    Fire,
    Earthquake,
    /// Any other event type; scored with the generic coefficients.
    #[serde(other)]
    Other,
}

impl DisasterType {
    pub fn all() -> &'static [DisasterType] {
        &[
            Self::Flood,
            Self::Cyclone,
            Self::Fire,
            Self::Earthquake,
            Self::Other,
        ]
    }

    /// Base evacuation multiplier for this event type.
    pub fn base_factor(&self) -> f64 {
        match self {
            Self::Flood => 1.00,
            Self::Cyclone => 0.95,
            Self::Fire => 0.85,
            Self::Earthquake | Self::Other => 0.90,
        }
    }

    /// Average road speed in km/h while the event is underway.
    pub fn base_speed_kmph(&self) -> f64 {
        match self {
            Self::Flood => 18.0,
            Self::Cyclone => 22.0,
            Self::Fire | Self::Earthquake | Self::Other => 26.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flood => "FLOOD",
            Self::Cyclone => "CYCLONE",
            Self::Fire => "FIRE",
            Self::Earthquake => "EARTHQUAKE",
            Self::Other => "OTHER",
        }
    }
}

/// Time of day the evacuation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    /// Night evacuations pull more people into shelters.
    pub fn demand_factor(&self) -> f64 {
        match self {
            Self::Day => 1.00,
            Self::Night => 1.10,
        }
    }
}

// ============================================================================
// SCENARIO
// ============================================================================

/// Disaster scenario for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub disaster_type: DisasterType,
    /// Event severity, 0–100.
    pub severity: f64,
    pub rainfall_mm: f64,
    pub wind_kmph: f64,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    /// Percent reduction in effective travel speed, 0–100.
    pub mobility_impact: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            disaster_type: DisasterType::Flood,
            severity: 70.0,
            rainfall_mm: 120.0,
            wind_kmph: 35.0,
            time_of_day: TimeOfDay::Day,
            mobility_impact: 35.0,
        }
    }
}

impl Scenario {
    /// Severity as a fraction in [0, 1].
    pub fn severity_fraction(&self) -> f64 {
        (self.severity / 100.0).clamp(0.0, 1.0)
    }

    /// Rainfall contribution to hazard. Floods saturate at 200 mm; other
    /// events count rain at most half.
    pub fn rain_factor(&self) -> f64 {
        match self.disaster_type {
            DisasterType::Flood => (self.rainfall_mm / 200.0).clamp(0.0, 1.0),
            _ => (self.rainfall_mm / 500.0).clamp(0.0, 0.5),
        }
    }

    /// Wind contribution to hazard. Cyclones saturate at 120 km/h.
    pub fn wind_factor(&self) -> f64 {
        match self.disaster_type {
            DisasterType::Cyclone => (self.wind_kmph / 120.0).clamp(0.0, 1.0),
            _ => (self.wind_kmph / 250.0).clamp(0.0, 0.35),
        }
    }

    /// Slowdown multiplier from reduced mobility, capped at +60%.
    pub fn mobility_factor(&self) -> f64 {
        1.0 + (self.mobility_impact / 100.0).clamp(0.0, 0.6)
    }

    /// Road congestion multiplier, up to 1.9 at full severity.
    pub fn congestion_factor(&self) -> f64 {
        1.0 + 0.9 * self.severity_fraction()
    }
}
