//! Per-shift selection/assignment block shared by every model.
//!
//! One block adds, for a single shift:
//! - `x[j]` binary, one per active location
//! - `z[i][j]` binary, one per demand `i` and coverer `j` in `Cov(i)`
//! - `sum_j x[j] = P`
//! - `sum_{j in Cov(i)} z[i][j] = 1` for every demand `i`
//! - `z[i][j] <= x[j]`

use std::collections::{BTreeMap, HashMap};

use highs::Col;
use tracing::warn;

use crate::data::{LocationId, Scenario};
use crate::error::EngineError;
use crate::locate::solver::{is_set, MipBuilder};
use crate::locate::Selection;

/// Objective coefficients for one shift, indexed by position in the
/// active location list.
pub(crate) struct Coefficients {
    pub site: Vec<f64>,
    /// Per demand: (coverer index, coefficient of `z[i][j]`).
    pub assignment: Vec<Vec<(usize, f64)>>,
}

impl Coefficients {
    /// `volume[j]` on `x[j]`, nothing on `z`.
    pub fn coverage(locations: &[LocationId], scenario: &Scenario) -> Result<Self, EngineError> {
        let index = index_of(locations);
        let site = locations
            .iter()
            .map(|j| scenario.volume(j))
            .collect::<Result<Vec<f64>, EngineError>>()?;
        let mut assignment = Vec::with_capacity(locations.len());
        for i in locations {
            let row: Vec<(usize, f64)> = scenario
                .coverage_of(i)?
                .iter()
                .map(|j| (index[j], 0.0))
                .collect();
            assignment.push(row);
        }
        Ok(Self { site, assignment })
    }

    /// `L * volume[j]` on `x[j]` and `-(time[i][j] + event[i]) * volume[j]`
    /// on `z[i][j]`.
    ///
    /// The response cost is weighted by the covering site's volume, not the
    /// demand point's.
    pub fn temporal(
        locations: &[LocationId],
        scenario: &Scenario,
        shift_length: f64,
    ) -> Result<Self, EngineError> {
        let index = index_of(locations);
        let site = locations
            .iter()
            .map(|j| scenario.volume(j).map(|v| shift_length * v))
            .collect::<Result<Vec<f64>, EngineError>>()?;
        let mut assignment = Vec::with_capacity(locations.len());
        for i in locations {
            let mut row = Vec::new();
            for j in scenario.coverage_of(i)? {
                let cost = scenario.response_time(i, j)? * scenario.volume(j)?;
                row.push((index[j], -cost));
            }
            assignment.push(row);
        }
        Ok(Self { site, assignment })
    }
}

/// Columns of one shift.
pub(crate) struct ShiftBlock {
    pub x: Vec<Col>,
    pub z: Vec<Vec<(usize, Col)>>,
}

impl ShiftBlock {
    pub fn add(mip: &mut MipBuilder, coef: &Coefficients, units: usize) -> Self {
        let x: Vec<Col> = coef.site.iter().map(|&c| mip.binary(c)).collect();
        let z: Vec<Vec<(usize, Col)>> = coef
            .assignment
            .iter()
            .map(|row| row.iter().map(|&(j, c)| (j, mip.binary(c))).collect())
            .collect();

        mip.equal(units as f64, x.iter().map(|&c| (c, 1.0)).collect());

        for row in &z {
            mip.equal(1.0, row.iter().map(|&(_, c)| (c, 1.0)).collect());
            for &(j, zc) in row {
                mip.at_most(0.0, vec![(zc, 1.0), (x[j], -1.0)]);
            }
        }

        Self { x, z }
    }

    pub fn read(&self, solution: &highs::Solution, locations: &[LocationId]) -> Selection {
        let sites = locations
            .iter()
            .zip(&self.x)
            .filter(|&(_, &c)| is_set(solution, c))
            .map(|(loc, _)| loc.clone())
            .collect();

        let mut assignments = BTreeMap::new();
        for (demand, row) in locations.iter().zip(&self.z) {
            if let Some(&(j, _)) = row.iter().find(|&&(_, c)| is_set(solution, c)) {
                assignments.insert(demand.clone(), locations[j].clone());
            }
        }

        Selection { sites, assignments }
    }
}

pub(crate) fn index_of(locations: &[LocationId]) -> HashMap<&LocationId, usize> {
    locations.iter().enumerate().map(|(k, loc)| (loc, k)).collect()
}

/// True when no assignment of `units` sites can exist, so the solver need
/// not be called.
pub(crate) fn trivially_infeasible(
    locations: &[LocationId],
    scenario: &Scenario,
    units: usize,
) -> bool {
    if units > locations.len() {
        warn!(units, available = locations.len(), "more units than locations");
        return true;
    }
    let uncovered = locations
        .iter()
        .filter(|i| scenario.coverage.get(*i).map_or(true, |c| c.is_empty()))
        .count();
    if uncovered > 0 {
        warn!(uncovered, "demand points without any coverer");
        return true;
    }
    false
}
