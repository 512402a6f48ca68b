//! ShelterPlan Headless Scenario Harness
//!
//! Runs the planning pipeline in-process against the built-in catalog (or
//! JSON files) and checks its invariants over a sweep of scenarios.
//! No storage, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p shelterplan-simtest
//!   cargo run -p shelterplan-simtest -- --verbose
//!   cargo run -p shelterplan-simtest -- --scenario cyclone.json --json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use shelterplan_logic::allocate::AllocationResult;
use shelterplan_logic::catalog::{
    builtin_shelters, builtin_zones, load_scenario, load_shelters, load_zones,
};
use shelterplan_logic::demand::{DemandEstimate, MAX_EVAC_RATE, MIN_EVAC_RATE};
use shelterplan_logic::pipeline::{run_scenario, ScenarioRun};
use shelterplan_logic::scenario::{DisasterType, Scenario, TimeOfDay};
use shelterplan_logic::shelter::{check_shelters, rank_shelters, CatalogIssue, Shelter};
use shelterplan_logic::zone::Zone;

// ── CLI ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "shelterplan-simtest",
    about = "Run the evacuation planning pipeline and check its invariants"
)]
struct Args {
    /// Print every check, not just failures.
    #[arg(long)]
    verbose: bool,

    /// Print the run for the chosen scenario as JSON and skip the sweep.
    #[arg(long)]
    json: bool,

    /// Zone catalog (JSON array). Defaults to the built-in catalog.
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Shelter catalog (JSON array). Defaults to the built-in catalog.
    #[arg(long)]
    shelters: Option<PathBuf>,

    /// Scenario (JSON object). Defaults to the planner's starting scenario.
    #[arg(long)]
    scenario: Option<PathBuf>,
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let zones = match &args.zones {
        Some(path) => load_zones(&read_text(path)?)
            .with_context(|| format!("loading zones from {}", path.display()))?,
        None => builtin_zones()?,
    };
    let shelters = match &args.shelters {
        Some(path) => load_shelters(&read_text(path)?)
            .with_context(|| format!("loading shelters from {}", path.display()))?,
        None => builtin_shelters()?,
    };
    let scenario = match &args.scenario {
        Some(path) => load_scenario(&read_text(path)?)
            .with_context(|| format!("loading scenario from {}", path.display()))?,
        None => Scenario::default(),
    };
    log::info!("Loaded {} zones, {} shelters", zones.len(), shelters.len());

    if args.json {
        let run = run_scenario(&zones, &shelters, &scenario)?;
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    let verbose = args.verbose;
    println!("=== ShelterPlan Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Shelter catalog
    results.extend(validate_shelter_catalog(&shelters, verbose));

    // 2. Chosen scenario
    let run = run_scenario(&zones, &shelters, &scenario)?;
    print_run(&run);
    results.extend(check_run("chosen", &zones, &shelters, &run));

    // 3. Sweep
    results.extend(sweep_scenarios(&zones, &shelters, &scenario, verbose)?);

    // 4. Determinism
    results.extend(validate_determinism(&zones, &shelters, &scenario)?);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. Shelter Catalog ──────────────────────────────────────────────────

fn validate_shelter_catalog(shelters: &[Shelter], verbose: bool) -> Vec<TestResult> {
    println!("--- Shelter Catalog ---");
    let mut results = Vec::new();

    let issues = check_shelters(shelters);
    for issue in &issues {
        match issue {
            CatalogIssue::OverCapacity(id, used, total) => {
                log::warn!("Shelter {} reports {} used of {} places", id, used, total)
            }
            CatalogIssue::ZeroCapacity(id) => log::warn!("Shelter {} has no capacity", id),
        }
    }
    // Reported, not fatal: the allocator treats these shelters as full.
    println!("  {} shelters, {} capacity issues", shelters.len(), issues.len());

    let mut ids: Vec<&str> = shelters.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: ids.len() == shelters.len(),
        detail: format!("{} shelters, {} distinct ids", shelters.len(), ids.len()),
    });

    if verbose {
        for r in rank_shelters(shelters) {
            println!(
                "  {:<28} score {:>3}  occupancy {:>3}%  free {:>6}",
                r.name, r.score, r.occupancy_pct, r.available
            );
        }
    }

    results
}

// ── 2. Single run ───────────────────────────────────────────────────────

fn print_run(run: &ScenarioRun) {
    println!(
        "--- {} severity {:.0} ({:?}) ---",
        run.scenario.disaster_type.label(),
        run.scenario.severity,
        run.scenario.time_of_day
    );
    for d in &run.demand {
        println!(
            "  {:<20} demand {:>7}  rate {:.3}  vuln {:.3}  hazard {:.3}",
            d.zone_name, d.demand, d.evac_rate, d.vulnerability, d.hazard
        );
    }
    for a in &run.allocation.assigned {
        println!(
            "  {} → {}: {} people, {:.2} km, {} min",
            a.zone_name, a.shelter_name, a.people, a.dist_km, a.time_min
        );
    }
    let m = &run.allocation.metrics;
    println!(
        "  demand {}  assigned {}  unserved {}  avg travel {} min  [{:?}]",
        m.total_demand,
        m.total_assigned,
        m.total_unserved,
        m.avg_travel_time_min,
        run.allocation.service_level()
    );
}

fn check_run(
    label: &str,
    zones: &[Zone],
    shelters: &[Shelter],
    run: &ScenarioRun,
) -> Vec<TestResult> {
    let mut results = Vec::new();
    let alloc = &run.allocation;

    results.push(check_demand_bounds(label, zones, &run.demand));

    let over_assigned: Vec<&DemandEstimate> = run
        .demand
        .iter()
        .filter(|d| alloc.assigned_from_zone(&d.zone_id) > d.demand as u64)
        .collect();
    results.push(TestResult {
        name: format!("{label}_zone_assignment_within_demand"),
        passed: over_assigned.is_empty(),
        detail: format!("{} zones over-assigned", over_assigned.len()),
    });

    results.push(check_shelter_capacity(label, shelters, alloc));

    let m = &alloc.metrics;
    results.push(TestResult {
        name: format!("{label}_totals_balance"),
        passed: m.total_assigned + m.total_unserved == m.total_demand,
        detail: format!(
            "{} + {} vs {}",
            m.total_assigned, m.total_unserved, m.total_demand
        ),
    });

    results
}

fn check_demand_bounds(label: &str, zones: &[Zone], demand: &[DemandEstimate]) -> TestResult {
    let bad: Vec<&str> = demand
        .iter()
        .zip(zones)
        .filter(|(d, z)| {
            d.evac_rate < MIN_EVAC_RATE || d.evac_rate > MAX_EVAC_RATE || d.demand > z.population
        })
        .map(|(d, _)| d.zone_id.as_str())
        .collect();
    TestResult {
        name: format!("{label}_demand_bounds"),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            format!("{} zones within rate and population bounds", demand.len())
        } else {
            format!("out of bounds: {}", bad.join(", "))
        },
    }
}

fn check_shelter_capacity(
    label: &str,
    shelters: &[Shelter],
    alloc: &AllocationResult,
) -> TestResult {
    let overfull: Vec<&str> = shelters
        .iter()
        .filter(|s| alloc.assigned_to_shelter(&s.id) > s.available() as u64)
        .map(|s| s.id.as_str())
        .collect();
    TestResult {
        name: format!("{label}_shelter_capacity"),
        passed: overfull.is_empty(),
        detail: if overfull.is_empty() {
            "no shelter over its available places".into()
        } else {
            format!("overfull: {}", overfull.join(", "))
        },
    }
}

// ── 3. Scenario sweep ───────────────────────────────────────────────────

fn sweep_scenarios(
    zones: &[Zone],
    shelters: &[Shelter],
    base: &Scenario,
    verbose: bool,
) -> Result<Vec<TestResult>> {
    println!("\n--- Scenario Sweep ---");
    let mut results = Vec::new();

    for disaster_type in DisasterType::all() {
        for time_of_day in [TimeOfDay::Day, TimeOfDay::Night] {
            for severity in [0.0, 50.0, 100.0] {
                let scenario = Scenario {
                    disaster_type: *disaster_type,
                    time_of_day,
                    severity,
                    ..base.clone()
                };
                let run = run_scenario(zones, shelters, &scenario)?;
                let label = format!(
                    "{}_{:?}_{:.0}",
                    disaster_type.label(),
                    time_of_day,
                    severity
                )
                .to_lowercase();
                if verbose {
                    let m = &run.allocation.metrics;
                    println!(
                        "  {:<22} demand {:>7}  unserved {:>7}  avg {:>3} min",
                        label, m.total_demand, m.total_unserved, m.avg_travel_time_min
                    );
                }
                results.extend(check_run(&label, zones, shelters, &run));
            }
        }
    }

    Ok(results)
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    zones: &[Zone],
    shelters: &[Shelter],
    scenario: &Scenario,
) -> Result<Vec<TestResult>> {
    let first = run_scenario(zones, shelters, scenario)?;
    let second = run_scenario(zones, shelters, scenario)?;
    Ok(vec![TestResult {
        name: "repeat_run_identical".into(),
        passed: first == second,
        detail: format!("{} assignments", first.allocation.assigned.len()),
    }])
}
