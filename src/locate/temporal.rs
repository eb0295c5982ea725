//! Temporal single-shift model
//!
//! Maximize `L * sum_j v[j] x[j] - sum_{i, j in Cov(i)} (t[i][j] + e[i]) v[j] z[i][j]`
//! subject to the same selection and assignment rows as the static model.
//!
//! The baseline and priority runs share this routine; they differ only in
//! the scenario passed in.

use highs::Sense;
use tracing::info;

use crate::config::EngineConfig;
use crate::data::{LocationId, Scenario};
use crate::error::EngineError;
use crate::locate::formulation::{trivially_infeasible, Coefficients, ShiftBlock};
use crate::locate::solver::{MipBuilder, SolveResult};
use crate::locate::{Selection, Solution, SolveStatus};

/// Solve the temporal model for one shift of length `config.shift_length`.
pub fn solve(
    locations: &[LocationId],
    scenario: &Scenario,
    config: &EngineConfig,
) -> Result<Solution<Selection>, EngineError> {
    config.validate()?;
    scenario.check(locations, true)?;
    if trivially_infeasible(locations, scenario, config.units) {
        return Ok(Solution::infeasible());
    }

    let coef = Coefficients::temporal(locations, scenario, config.shift_length)?;
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
        model = "temporal",
        status = ?solution.status,
        sites = solution.selection.len(),
        objective = solution.objective,
        "model solved"
    );
    Ok(solution)
}
