//! Static coverage model
//!
//! Maximize the traffic volume of the P staffed sites. The assignment
//! variables carry no objective weight; they only certify that every demand
//! point can be answered by some staffed site in its coverage set.

use highs::Sense;
use tracing::info;

use crate::config::EngineConfig;
use crate::data::{LocationId, Scenario};
use crate::error::EngineError;
use crate::locate::formulation::{trivially_infeasible, Coefficients, ShiftBlock};
use crate::locate::solver::{MipBuilder, SolveResult};
use crate::locate::{Selection, Solution, SolveStatus};

/// Solve the static coverage model over `locations` with `config.units` sites.
pub fn solve(
    locations: &[LocationId],
    scenario: &Scenario,
    config: &EngineConfig,
) -> Result<Solution<Selection>, EngineError> {
    config.validate()?;
    scenario.check(locations, false)?;
    if trivially_infeasible(locations, scenario, config.units) {
        return Ok(Solution::infeasible());
    }

    let coef = Coefficients::coverage(locations, scenario)?;
    let mut mip = MipBuilder::new();
    let block = ShiftBlock::add(&mut mip, &coef, config.units);

    let solution = match mip.solve(Sense::Maximise)? {
        SolveResult::Optimal { objective, solution } => Solution {
            status: SolveStatus::Optimal,
            selection: block.read(&solution, locations),
            objective,
        },
        SolveResult::Infeasible => Solution::infeasible(),
    };

    info!(
        model = "static_coverage",
        status = ?solution.status,
        sites = solution.selection.len(),
        objective = solution.objective,
        "model solved"
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn id(s: &str) -> LocationId {
        LocationId::from(s)
    }

    fn scenario(volumes: &[(&str, f64)], cov: &[(&str, &[&str])]) -> Scenario {
        let mut s = Scenario::default();
        for &(loc, v) in volumes {
            s.volumes.insert(id(loc), v);
        }
        for &(i, members) in cov {
            s.coverage
                .insert(id(i), members.iter().map(|&m| id(m)).collect::<BTreeSet<_>>());
        }
        s
    }

    fn abcd() -> Vec<LocationId> {
        ["A", "B", "C", "D"].iter().map(|&n| id(n)).collect()
    }

    const VOLUMES: [(&str, f64); 4] = [("A", 10.0), ("B", 5.0), ("C", 1.0), ("D", 1.0)];

    #[test]
    fn picks_heaviest_sites_that_cover_everyone() {
        let s = scenario(
            &VOLUMES,
            &[("A", &["A"]), ("B", &["B"]), ("C", &["A", "C"]), ("D", &["B", "D"])],
        );
        let sol = solve(&abcd(), &s, &EngineConfig::new(2, 8.0)).unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(sol.selection.sites, vec![id("A"), id("B")]);
        assert!((sol.objective - 15.0).abs() < 1e-6);
        assert_eq!(sol.selection.assignments[&id("C")], id("A"));
        assert_eq!(sol.selection.assignments[&id("D")], id("B"));
    }

    #[test]
    fn self_coverage_forces_every_site_open() {
        let s = scenario(
            &VOLUMES,
            &[("A", &["A"]), ("B", &["B"]), ("C", &["C"]), ("D", &["D"])],
        );
        let sol = solve(&abcd(), &s, &EngineConfig::new(2, 8.0)).unwrap();
        assert_eq!(sol.status, SolveStatus::Infeasible);
        assert!(sol.selection.is_empty());
        assert_eq!(sol.objective, 0.0);

        let sol = solve(&abcd(), &s, &EngineConfig::new(4, 8.0)).unwrap();
        assert!(sol.is_optimal());
        assert!((sol.objective - 17.0).abs() < 1e-6);
    }

    #[test]
    fn more_units_than_locations_is_infeasible() {
        let s = scenario(
            &VOLUMES,
            &[("A", &["A"]), ("B", &["B"]), ("C", &["C"]), ("D", &["D"])],
        );
        let sol = solve(&abcd(), &s, &EngineConfig::new(5, 8.0)).unwrap();
        assert_eq!(sol.status, SolveStatus::Infeasible);
        assert!(sol.selection.is_empty());
        assert_eq!(sol.objective, 0.0);
    }

    #[test]
    fn unfiltered_empty_set_is_infeasible_not_an_error() {
        let s = scenario(&VOLUMES, &[("A", &["A"]), ("B", &[]), ("C", &["A"]), ("D", &["A"])]);
        let sol = solve(&abcd(), &s, &EngineConfig::new(1, 8.0)).unwrap();
        assert_eq!(sol.status, SolveStatus::Infeasible);
    }

    #[test]
    fn missing_volume_fails_fast() {
        let s = scenario(
            &VOLUMES[..3],
            &[("A", &["A"]), ("B", &["B"]), ("C", &["C"]), ("D", &["D"])],
        );
        let err = solve(&abcd(), &s, &EngineConfig::new(4, 8.0)).unwrap_err();
        assert!(matches!(err, EngineError::MissingVolume(_)));
    }
}
