//! Cost model — distance, modeled travel time, and edge ranking cost.
//!
//! Travel time scales straight-line distance by a disaster-dependent road
//! speed, congestion from severity, reduced mobility, and a penalty for
//! routing people toward riskier shelters. The edge cost adds a distance
//! term on top of minutes and is only ever used for ordering.

use serde::{Deserialize, Serialize};

use crate::demand::DemandEstimate;
use crate::scenario::Scenario;
use crate::shelter::{Shelter, ShelterRisk};
use crate::zone::Zone;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two lat/lng points in kilometers.
pub fn haversine_km(a_lat: f64, a_lng: f64, b_lat: f64, b_lng: f64) -> f64 {
    let d_lat = ((b_lat - a_lat) * std::f64::consts::PI) / 180.0;
    let d_lng = ((b_lng - a_lng) * std::f64::consts::PI) / 180.0;
    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lng / 2.0).sin();
    let c1 = ((a_lat * std::f64::consts::PI) / 180.0).cos();
    let c2 = ((b_lat * std::f64::consts::PI) / 180.0).cos();
    let x = s1 * s1 + c1 * c2 * s2 * s2;
    let y = 2.0 * x.sqrt().atan2((1.0 - x).sqrt());
    EARTH_RADIUS_KM * y
}

/// Modeled travel time in whole minutes for `dist_km` toward a shelter
/// rated `risk`.
pub fn travel_time_min(dist_km: f64, scenario: &Scenario, risk: ShelterRisk) -> u32 {
    let base_speed = scenario.disaster_type.base_speed_kmph();
    let minutes = (dist_km / base_speed)
        * 60.0
        * scenario.congestion_factor()
        * scenario.mobility_factor()
        * risk.travel_penalty();
    minutes.round() as u32
}

/// Ranking cost of an edge: minutes plus two points per kilometer.
pub fn edge_cost(dist_km: f64, time_min: u32) -> u32 {
    time_min.saturating_add((dist_km * 2.0).round() as u32)
}

/// Round a distance to two decimals for reporting.
fn round_km(dist_km: f64) -> f64 {
    (dist_km * 100.0).round() / 100.0
}

/// One (zone, shelter) pair with its travel figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEdge {
    pub zone_id: String,
    pub zone_name: String,
    pub shelter_id: String,
    pub shelter_name: String,
    /// Distance rounded to 0.01 km. The cost uses the unrounded value.
    pub dist_km: f64,
    pub time_min: u32,
    pub cost: u32,
    /// Position of the demand entry this edge serves.
    #[serde(skip)]
    pub(crate) demand_idx: usize,
    /// Position of the shelter in the catalog.
    #[serde(skip)]
    pub(crate) shelter_idx: usize,
}

impl CostEdge {
    fn new(
        demand_idx: usize,
        zone: &Zone,
        shelter_idx: usize,
        shelter: &Shelter,
        scenario: &Scenario,
    ) -> Self {
        let dist = haversine_km(zone.lat, zone.lng, shelter.lat, shelter.lng);
        let time_min = travel_time_min(dist, scenario, shelter.risk);
        CostEdge {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            shelter_id: shelter.id.clone(),
            shelter_name: shelter.name.clone(),
            dist_km: round_km(dist),
            time_min,
            cost: edge_cost(dist, time_min),
            demand_idx,
            shelter_idx,
        }
    }
}

/// Build the complete edge set, demand entries outer and shelters inner.
///
/// `zone_for_demand[i]` is the catalog zone for `demand[i]`; the caller has
/// already resolved ids. The order produced here is the tie-break order for
/// equal-cost edges.
pub fn build_edges(
    demand: &[DemandEstimate],
    zone_for_demand: &[&Zone],
    shelters: &[Shelter],
    scenario: &Scenario,
) -> Vec<CostEdge> {
    debug_assert_eq!(demand.len(), zone_for_demand.len());
    let mut edges = Vec::with_capacity(demand.len() * shelters.len());
    for (demand_idx, zone) in zone_for_demand.iter().enumerate() {
        for (shelter_idx, shelter) in shelters.iter().enumerate() {
            edges.push(CostEdge::new(
                demand_idx,
                zone,
                shelter_idx,
                shelter,
                scenario,
            ));
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{DisasterType, TimeOfDay};

    fn scenario(disaster_type: DisasterType, severity: f64, mobility_impact: f64) -> Scenario {
        Scenario {
            disaster_type,
            severity,
            rainfall_mm: 0.0,
            wind_kmph: 0.0,
            time_of_day: TimeOfDay::Day,
            mobility_impact,
        }
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(13.08, 80.27, 13.08, 80.27), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        // One degree of latitude ≈ 111.19 km on a 6371 km sphere.
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = haversine_km(13.115, 80.230, 13.0605, 80.2750);
        let b = haversine_km(13.0605, 80.2750, 13.115, 80.230);
        assert!((a - b).abs() < 1e-9);
        assert!(a > 7.0 && a < 8.0, "got {a}");
    }

    #[test]
    fn test_travel_time_base_speeds() {
        let calm = |t| scenario(t, 0.0, 0.0);
        // 18 km at 18 km/h = 60 min
        assert_eq!(
            travel_time_min(18.0, &calm(DisasterType::Flood), ShelterRisk::Low),
            60
        );
        // 22 km at 22 km/h = 60 min
        assert_eq!(
            travel_time_min(22.0, &calm(DisasterType::Cyclone), ShelterRisk::Low),
            60
        );
        // 26 km at 26 km/h = 60 min
        assert_eq!(
            travel_time_min(26.0, &calm(DisasterType::Earthquake), ShelterRisk::Low),
            60
        );
    }

    #[test]
    fn test_travel_time_multipliers() {
        // 60 min base * 1.9 congestion * 1.6 mobility * 1.25 risk = 228 min
        let s = scenario(DisasterType::Flood, 100.0, 100.0);
        assert_eq!(travel_time_min(18.0, &s, ShelterRisk::High), 228);
        // Moderate: 60 * 1.9 * 1.6 * 1.12 = 204.288
        assert_eq!(travel_time_min(18.0, &s, ShelterRisk::Moderate), 204);
    }

    #[test]
    fn test_edge_cost() {
        assert_eq!(edge_cost(3.3, 12), 12 + 7);
        assert_eq!(edge_cost(0.0, 0), 0);
        assert_eq!(edge_cost(1.2, 5), 5 + 2);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(7.12345), 7.12);
        assert_eq!(round_km(0.0), 0.0);
    }

    #[test]
    fn test_build_edges_enumeration_order() {
        let zone = |id: &str, lat: f64| Zone {
            id: id.into(),
            name: id.into(),
            lat,
            lng: 80.0,
            population: 100,
            elderly_pct: 0.1,
            poverty_pct: 0.1,
            past_incidents: 0,
            elevation_m: 5.0,
            hospital_km: 1.0,
        };
        let shelter = |id: &str| Shelter {
            id: id.into(),
            name: id.into(),
            lat: 13.0,
            lng: 80.0,
            risk: ShelterRisk::Low,
            capacity_total: 10,
            capacity_used: 0,
        };
        let zones = [zone("Z1", 13.1), zone("Z2", 13.2)];
        let demand: Vec<DemandEstimate> = zones
            .iter()
            .map(|z| DemandEstimate {
                zone_id: z.id.clone(),
                zone_name: z.name.clone(),
                demand: 10,
                evac_rate: 0.1,
                vulnerability: 0.0,
                hazard: 0.0,
            })
            .collect();
        let refs: Vec<&Zone> = zones.iter().collect();
        let shelters = [shelter("S1"), shelter("S2"), shelter("S3")];
        let edges = build_edges(&demand, &refs, &shelters, &Scenario::default());
        let pairs: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.zone_id.as_str(), e.shelter_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Z1", "S1"),
                ("Z1", "S2"),
                ("Z1", "S3"),
                ("Z2", "S1"),
                ("Z2", "S2"),
                ("Z2", "S3"),
            ]
        );
    }
}
