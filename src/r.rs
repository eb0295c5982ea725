//! R bindings, compiled with the `r` feature.
//!
//! Coverage sets and travel times are passed as parallel edge-list vectors:
//! `cov_demand[k]` may be covered by `cov_site[k]`, at `travel[k]` minutes.

use extendr_api::prelude::*;

use crate::config::{self, EngineConfig};
use crate::data::{LocationId, Scenario};
use crate::filter::sanitize;
use crate::locate::{joint, static_coverage, temporal, Selection, Solution};

fn ids(names: &[String]) -> Vec<LocationId> {
    names.iter().map(|n| LocationId::from(n.as_str())).collect()
}

fn names(ids: &[LocationId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn edges(
    demand: &[String],
    site: &[String],
    travel: Option<&[f64]>,
) -> Vec<(LocationId, LocationId, Option<f64>)> {
    demand
        .iter()
        .zip(site)
        .enumerate()
        .map(|(k, (i, j))| {
            let t = travel.and_then(|t| t.get(k)).copied();
            (LocationId::from(i.as_str()), LocationId::from(j.as_str()), t)
        })
        .collect()
}

fn edge_lists(scenario: &Scenario) -> (Vec<String>, Vec<String>) {
    scenario
        .coverage_edges()
        .map(|(i, j)| (i.to_string(), j.to_string()))
        .unzip()
}

fn selection_list(result: std::result::Result<Solution<Selection>, crate::EngineError>) -> List {
    match result {
        Ok(sol) => list!(
            selected = names(&sol.selection.sites),
            n_selected = sol.selection.len() as i32,
            objective = sol.objective,
            status = format!("{:?}", sol.status)
        ),
        Err(e) => list!(error = e.to_string()),
    }
}

/// Drop locations without a coverer in either of two coverage scenarios
///
/// Isolation is repeated until every retained location keeps a coverer in
/// both scenarios, so the returned edge lists can be passed straight to the
/// model functions.
///
/// @param locations Location identifiers
/// @param std_demand,std_site Baseline coverage edge list
/// @param prio_demand,prio_site Priority coverage edge list
/// @return List with retained and isolated locations, both pruned edge lists
///   and the number of pruning rounds
/// @export
#[extendr]
fn rust_patrol_filter(
    locations: Vec<String>,
    std_demand: Vec<String>,
    std_site: Vec<String>,
    prio_demand: Vec<String>,
    prio_site: Vec<String>,
) -> List {
    let locs = ids(&locations);
    let standard = Scenario::from_edges(&locs, &[], None, edges(&std_demand, &std_site, None));
    let priority = Scenario::from_edges(&locs, &[], None, edges(&prio_demand, &prio_site, None));
    let clean = sanitize(&locs, standard, priority);
    let isolated: Vec<LocationId> = clean.isolated.iter().cloned().collect();
    let (std_demand, std_site) = edge_lists(&clean.standard);
    let (prio_demand, prio_site) = edge_lists(&clean.priority);

    list!(
        retained = names(&clean.locations),
        isolated = names(&isolated),
        std_demand = std_demand,
        std_site = std_site,
        prio_demand = prio_demand,
        prio_site = prio_site,
        rounds = clean.rounds as i32
    )
}

/// Solve the static coverage model
///
/// @param locations Location identifiers
/// @param volumes Traffic volume per location
/// @param cov_demand,cov_site Coverage edge list
/// @param n_units Number of sites to staff
/// @return List with selected sites and objective
/// @export
#[extendr]
fn rust_patrol_static(
    locations: Vec<String>,
    volumes: Vec<f64>,
    cov_demand: Vec<String>,
    cov_site: Vec<String>,
    n_units: i32,
) -> List {
    let locs = ids(&locations);
    let units = match config::unit_count(n_units.into()) {
        Ok(units) => units,
        Err(e) => return list!(error = e.to_string()),
    };
    let scenario = Scenario::from_edges(&locs, &volumes, None, edges(&cov_demand, &cov_site, None));
    let config = EngineConfig::default().with_units(units);
    selection_list(static_coverage::solve(&locs, &scenario, &config))
}

/// Solve the temporal single-shift model
///
/// @param locations Location identifiers
/// @param volumes Traffic volume per location
/// @param event_times On-scene minutes per location
/// @param cov_demand,cov_site Coverage edge list
/// @param travel Travel minutes per coverage edge
/// @param n_units Number of sites to staff
/// @param shift_length Shift length
/// @return List with selected sites and objective
/// @export
#[extendr]
fn rust_patrol_temporal(
    locations: Vec<String>,
    volumes: Vec<f64>,
    event_times: Vec<f64>,
    cov_demand: Vec<String>,
    cov_site: Vec<String>,
    travel: Vec<f64>,
    n_units: i32,
    shift_length: f64,
) -> List {
    let locs = ids(&locations);
    let units = match config::unit_count(n_units.into()) {
        Ok(units) => units,
        Err(e) => return list!(error = e.to_string()),
    };
    let scenario = Scenario::from_edges(
        &locs,
        &volumes,
        Some(event_times.as_slice()),
        edges(&cov_demand, &cov_site, Some(travel.as_slice())),
    );
    let config = EngineConfig::new(units, shift_length);
    selection_list(temporal::solve(&locs, &scenario, &config))
}

/// Solve the joint three-shift model
///
/// @inheritParams rust_patrol_temporal
/// @param penalty_margin Margin added to the reuse penalty weight
/// @return List with per-shift sites, reuse statistics and reconciled objective
/// @export
#[extendr]
fn rust_patrol_joint(
    locations: Vec<String>,
    volumes: Vec<f64>,
    event_times: Vec<f64>,
    cov_demand: Vec<String>,
    cov_site: Vec<String>,
    travel: Vec<f64>,
    n_units: i32,
    shift_length: f64,
    penalty_margin: f64,
) -> List {
    let locs = ids(&locations);
    let units = match config::unit_count(n_units.into()) {
        Ok(units) => units,
        Err(e) => return list!(error = e.to_string()),
    };
    let scenario = Scenario::from_edges(
        &locs,
        &volumes,
        Some(event_times.as_slice()),
        edges(&cov_demand, &cov_site, Some(travel.as_slice())),
    );
    let config = EngineConfig::new(units, shift_length)
        .with_penalty_margin(penalty_margin);

    match joint::solve(&locs, &scenario, &config) {
        Ok(sol) => {
            let plan = &sol.selection;
            let shift_sites = |k: usize| {
                plan.shifts
                    .get(&joint::SHIFTS[k])
                    .map(|sel| names(&sel.sites))
                    .unwrap_or_default()
            };
            list!(
                unique = names(&plan.unique),
                shift_1 = shift_sites(0),
                shift_2 = shift_sites(1),
                shift_3 = shift_sites(2),
                reuse_count = plan.reuse.count as i32,
                reuse_amount = plan.reuse.amount,
                penalty_weight = plan.penalty_weight,
                raw_objective = plan.raw_objective,
                objective = sol.objective,
                status = format!("{:?}", sol.status)
            )
        }
        Err(e) => list!(error = e.to_string()),
    }
}

// Macro to generate exports
extendr_module! {
    mod patrolopt;
    fn rust_patrol_filter;
    fn rust_patrol_static;
    fn rust_patrol_temporal;
    fn rust_patrol_joint;
}
