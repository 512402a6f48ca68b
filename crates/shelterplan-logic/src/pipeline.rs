//! One planning run: predict demand, then allocate it.

use serde::{Deserialize, Serialize};

use crate::allocate::{allocate, AllocationResult};
use crate::demand::{predict_demand, DemandEstimate};
use crate::error::PlanError;
use crate::scenario::Scenario;
use crate::shelter::Shelter;
use crate::zone::Zone;

/// Everything a planning run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRun {
    pub scenario: Scenario,
    pub demand: Vec<DemandEstimate>,
    pub allocation: AllocationResult,
}

/// Run the predictor and the allocator for one scenario.
///
/// Nothing is cached between calls; re-run on every input change.
pub fn run_scenario(
    zones: &[Zone],
    shelters: &[Shelter],
    scenario: &Scenario,
) -> Result<ScenarioRun, PlanError> {
    let demand = predict_demand(zones, scenario);
    let allocation = allocate(zones, shelters, &demand, scenario)?;

    let m = &allocation.metrics;
    log::info!(
        "{} sev={:.0}: demand={} assigned={} unserved={} avg_travel={}min ({:?})",
        scenario.disaster_type.label(),
        scenario.severity,
        m.total_demand,
        m.total_assigned,
        m.total_unserved,
        m.avg_travel_time_min,
        allocation.service_level()
    );
    if let Some(summary) = shortfall_summary(&allocation) {
        log::warn!("{}", summary);
        for u in &allocation.unserved {
            log::debug!("{} ({}): {} unserved", u.zone_name, u.zone_id, u.unserved);
        }
    }

    Ok(ScenarioRun {
        scenario: scenario.clone(),
        demand,
        allocation,
    })
}

/// One-line shortfall report, or `None` when every zone was served.
fn shortfall_summary(allocation: &AllocationResult) -> Option<String> {
    let unserved = allocation.metrics.total_unserved;
    (unserved > 0).then(|| {
        format!(
            "{} people in {} zones without a shelter place",
            unserved,
            allocation.unserved.len()
        )
    })
}
