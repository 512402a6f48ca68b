//! Shelter allocation — greedy capacitated assignment of demand to shelters.
//!
//! Every (zone, shelter) edge is ranked by cost and walked cheapest first.
//! Each edge takes as many people as both the zone's residual need and the
//! shelter's remaining places allow. Decisions are never revisited: a zone
//! that grabs a shelter early can push a later zone onto a much longer trip,
//! and when capacity runs short the zones left unserved are simply the ones
//! whose edges came last. The plan is not cost-optimal and is not meant to be.
//!
//! Equal-cost edges keep their enumeration order (demand entries outer,
//! shelters inner), which makes results reproducible run to run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cost::{build_edges, CostEdge};
use crate::demand::{total_demand, DemandEstimate};
use crate::error::PlanError;
use crate::scenario::Scenario;
use crate::shelter::Shelter;
use crate::zone::Zone;

/// People sent along one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub zone_id: String,
    pub zone_name: String,
    pub shelter_id: String,
    pub shelter_name: String,
    pub dist_km: f64,
    pub time_min: u32,
    pub cost: u32,
    pub people: u32,
}

impl Assignment {
    fn from_edge(edge: &CostEdge, people: u32) -> Self {
        Assignment {
            zone_id: edge.zone_id.clone(),
            zone_name: edge.zone_name.clone(),
            shelter_id: edge.shelter_id.clone(),
            shelter_name: edge.shelter_name.clone(),
            dist_km: edge.dist_km,
            time_min: edge.time_min,
            cost: edge.cost,
            people,
        }
    }
}

/// Residual need of a zone after the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnservedZone {
    pub zone_id: String,
    pub zone_name: String,
    pub unserved: u32,
}

/// Places left in a shelter after the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRemaining {
    pub id: String,
    pub name: String,
    pub remaining: u32,
}

/// Aggregate figures for one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationMetrics {
    pub total_demand: u64,
    pub total_assigned: u64,
    pub total_unserved: u64,
    /// People-weighted mean travel time, rounded to whole minutes.
    pub avg_travel_time_min: u32,
}

/// Coarse status of a run, by unserved people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceLevel {
    /// Everyone has a place.
    Good,
    /// Up to `CRITICAL_UNSERVED` people without a place.
    Strained,
    /// More than `CRITICAL_UNSERVED` people without a place.
    Critical,
}

/// Unserved head count above which a run is critical.
pub const CRITICAL_UNSERVED: u64 = 2000;

/// Result of allocating demand to shelters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Assignments in the order they were decided.
    pub assigned: Vec<Assignment>,
    /// Zones left with residual need, in demand order.
    pub unserved: Vec<UnservedZone>,
    /// Every shelter's remaining places, in catalog order.
    pub shelter_remaining: Vec<ShelterRemaining>,
    pub metrics: AllocationMetrics,
}

impl AllocationResult {
    pub fn service_level(&self) -> ServiceLevel {
        match self.metrics.total_unserved {
            0 => ServiceLevel::Good,
            n if n <= CRITICAL_UNSERVED => ServiceLevel::Strained,
            _ => ServiceLevel::Critical,
        }
    }

    /// People assigned from one zone across all shelters.
    pub fn assigned_from_zone(&self, zone_id: &str) -> u64 {
        self.assigned
            .iter()
            .filter(|a| a.zone_id == zone_id)
            .map(|a| a.people as u64)
            .sum()
    }

    /// People assigned into one shelter across all zones.
    pub fn assigned_to_shelter(&self, shelter_id: &str) -> u64 {
        self.assigned
            .iter()
            .filter(|a| a.shelter_id == shelter_id)
            .map(|a| a.people as u64)
            .sum()
    }
}

/// Index records by id, rejecting duplicates.
fn index_by_id<'a, T>(
    items: &'a [T],
    id: impl Fn(&'a T) -> &'a str,
    duplicate: impl Fn(String) -> PlanError,
) -> Result<HashMap<&'a str, usize>, PlanError> {
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let key = id(item);
        if index.insert(key, i).is_some() {
            return Err(duplicate(key.to_string()));
        }
    }
    Ok(index)
}

/// Allocate predicted demand to shelters.
///
/// `demand_by_zone` normally comes straight from
/// [`predict_demand`](crate::demand::predict_demand). Each entry must name a
/// zone in `zones`; ids must be unique within each list. Shelter capacity is
/// read from the records and never written back.
pub fn allocate(
    zones: &[Zone],
    shelters: &[Shelter],
    demand_by_zone: &[DemandEstimate],
    scenario: &Scenario,
) -> Result<AllocationResult, PlanError> {
    let zone_index = index_by_id(zones, |z| z.id.as_str(), PlanError::DuplicateZone)?;
    index_by_id(shelters, |s| s.id.as_str(), PlanError::DuplicateShelter)?;
    index_by_id(
        demand_by_zone,
        |d| d.zone_id.as_str(),
        PlanError::DuplicateDemand,
    )?;

    let zone_for_demand = demand_by_zone
        .iter()
        .map(|d| {
            zone_index
                .get(d.zone_id.as_str())
                .map(|&i| &zones[i])
                .ok_or_else(|| PlanError::UnknownZone(d.zone_id.clone()))
        })
        .collect::<Result<Vec<&Zone>, PlanError>>()?;

    let mut available: Vec<u32> = shelters.iter().map(Shelter::available).collect();
    let mut remaining: Vec<u32> = demand_by_zone.iter().map(|d| d.demand).collect();

    let mut edges = build_edges(demand_by_zone, &zone_for_demand, shelters, scenario);
    // Stable: equal costs keep enumeration order.
    edges.sort_by_key(|e| e.cost);

    let mut assigned = Vec::new();
    for edge in &edges {
        let need = remaining[edge.demand_idx];
        if need == 0 {
            continue;
        }
        let free = available[edge.shelter_idx];
        if free == 0 {
            continue;
        }
        let take = need.min(free);
        available[edge.shelter_idx] -= take;
        remaining[edge.demand_idx] -= take;
        assigned.push(Assignment::from_edge(edge, take));
    }

    let unserved: Vec<UnservedZone> = demand_by_zone
        .iter()
        .zip(&remaining)
        .filter(|(_, &left)| left > 0)
        .map(|(d, &left)| UnservedZone {
            zone_id: d.zone_id.clone(),
            zone_name: d.zone_name.clone(),
            unserved: left,
        })
        .collect();

    let shelter_remaining = shelters
        .iter()
        .zip(&available)
        .map(|(s, &left)| ShelterRemaining {
            id: s.id.clone(),
            name: s.name.clone(),
            remaining: left,
        })
        .collect();

    let metrics = compute_metrics(demand_by_zone, &assigned);
    log::debug!(
        "Allocated {}/{} people over {} edges ({} assignments, {} zones unserved)",
        metrics.total_assigned,
        metrics.total_demand,
        edges.len(),
        assigned.len(),
        unserved.len()
    );

    Ok(AllocationResult {
        assigned,
        unserved,
        shelter_remaining,
        metrics,
    })
}

fn compute_metrics(demand: &[DemandEstimate], assigned: &[Assignment]) -> AllocationMetrics {
    let total_demand = total_demand(demand);
    let total_assigned: u64 = assigned.iter().map(|a| a.people as u64).sum();
    let weighted_time: u64 = assigned
        .iter()
        .map(|a| a.people as u64 * a.time_min as u64)
        .sum();
    let avg_travel_time_min = if total_assigned == 0 {
        0
    } else {
        (weighted_time as f64 / total_assigned as f64).round() as u32
    };
    AllocationMetrics {
        total_demand,
        total_assigned,
        total_unserved: total_demand - total_assigned,
        avg_travel_time_min,
    }
}
