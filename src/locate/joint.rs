//! Joint multi-shift model
//!
//! Three shifts solved as one program. Each shift carries the temporal
//! model's columns and rows. An overlap slack `u[j] >= sum_f x[j,f] - 1`
//! counts the extra shifts that reuse site `j`, and every unit of it costs
//! the penalty weight:
//!
//! `PenaltyWeight = L * (sum of the P largest volumes) + margin`
//!
//! The first term bounds the best gross value one shift can earn, so reusing
//! a site only pays off when no reuse-free plan is feasible.

use std::collections::BTreeMap;
use std::fmt;

use highs::{Col, Sense};
use serde::Serialize;
use tracing::info;

use crate::config::EngineConfig;
use crate::data::{LocationId, Scenario};
use crate::error::EngineError;
use crate::locate::formulation::{trivially_infeasible, Coefficients, ShiftBlock};
use crate::locate::reconcile::{true_objective, ReuseStats};
use crate::locate::solver::{MipBuilder, SolveResult};
use crate::locate::{Selection, Solution, SolveStatus};

/// Duty shift number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Shift(pub u8);

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shift {}", self.0)
    }
}

pub const SHIFTS: [Shift; 3] = [Shift(1), Shift(2), Shift(3)];

/// Selection of a joint solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftPlan {
    /// Sites staffed in at least one shift, in location order.
    pub unique: Vec<LocationId>,
    pub shifts: BTreeMap<Shift, Selection>,
    pub reuse: ReuseStats,
    pub penalty_weight: f64,
    /// Solver objective with the penalty still subtracted.
    pub raw_objective: f64,
}

impl Default for ShiftPlan {
    fn default() -> Self {
        Self {
            unique: Vec::new(),
            shifts: SHIFTS.iter().map(|&f| (f, Selection::default())).collect(),
            reuse: ReuseStats::default(),
            penalty_weight: 0.0,
            raw_objective: 0.0,
        }
    }
}

/// `shift_length * (sum of the top-`units` volumes) + margin`.
pub fn penalty_weight<I>(volumes: I, units: usize, shift_length: f64, margin: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = volumes.into_iter().collect();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let top: f64 = sorted.iter().take(units).sum();
    shift_length * top + margin
}

/// Solve the joint three-shift model. The returned objective is already
/// reconciled.
pub fn solve(
    locations: &[LocationId],
    scenario: &Scenario,
    config: &EngineConfig,
) -> Result<Solution<ShiftPlan>, EngineError> {
    config.validate()?;
    scenario.check(locations, true)?;
    if trivially_infeasible(locations, scenario, config.units) {
        return Ok(Solution::infeasible());
    }

    let volumes = locations
        .iter()
        .map(|j| scenario.volume(j))
        .collect::<Result<Vec<f64>, EngineError>>()?;
    let weight = penalty_weight(
        volumes,
        config.units,
        config.shift_length,
        config.penalty_margin,
    );

    let coef = Coefficients::temporal(locations, scenario, config.shift_length)?;
    let mut mip = MipBuilder::new();
    let blocks: Vec<ShiftBlock> = SHIFTS
        .iter()
        .map(|_| ShiftBlock::add(&mut mip, &coef, config.units))
        .collect();

    let slack: Vec<Col> = (0..locations.len())
        .map(|_| mip.continuous(-weight, 0.0..))
        .collect();
    for (j, &u) in slack.iter().enumerate() {
        // u[j] - sum_f x[j,f] >= -1
        let mut terms = vec![(u, 1.0)];
        terms.extend(blocks.iter().map(|b| (b.x[j], -1.0)));
        mip.at_least(-1.0, terms);
    }

    let (raw, solution) = match mip.solve(Sense::Maximise)? {
        SolveResult::Optimal { objective, solution } => (objective, solution),
        SolveResult::Infeasible => {
            info!(model = "joint", status = ?SolveStatus::Infeasible, "model solved");
            return Ok(Solution::infeasible());
        }
    };

    let reuse = ReuseStats::from_slack(
        slack.iter().map(|&u| solution[u].max(0.0)),
        config.reuse_tolerance,
    );
    let shifts: BTreeMap<Shift, Selection> = SHIFTS
        .iter()
        .zip(&blocks)
        .map(|(&f, block)| (f, block.read(&solution, locations)))
        .collect();
    let unique = locations
        .iter()
        .filter(|loc| shifts.values().any(|sel| sel.contains(loc)))
        .cloned()
        .collect();
    let objective = true_objective(raw, &reuse, weight);

    info!(
        model = "joint",
        status = ?SolveStatus::Optimal,
        raw_objective = raw,
        objective,
        penalty_weight = weight,
        reused_sites = reuse.count,
        reuse_amount = reuse.amount,
        "model solved"
    );

    Ok(Solution {
        status: SolveStatus::Optimal,
        selection: ShiftPlan {
            unique,
            shifts,
            reuse,
            penalty_weight: weight,
            raw_objective: raw,
        },
        objective,
    })
}
