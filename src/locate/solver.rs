//! HiGHS MIP solver interface
//!
//! Thin wrapper around a row-based HiGHS problem. Models add columns and rows
//! through [`MipBuilder`] and get back either an optimal solution, an
//! infeasibility verdict, or a backend error for every other termination.

use std::ops::RangeBounds;

use highs::{Col, HighsModelStatus, RowProblem, Sense, Solution};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Binary values above this are read as 1.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Terminal state of one solve.
pub enum SolveResult {
    Optimal { objective: f64, solution: Solution },
    Infeasible,
}

/// Row-based problem under construction, one per solve.
pub struct MipBuilder {
    pb: RowProblem,
    n_cols: usize,
    n_rows: usize,
}

impl Default for MipBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MipBuilder {
    pub fn new() -> Self {
        Self {
            pb: RowProblem::new(),
            n_cols: 0,
            n_rows: 0,
        }
    }

    /// Binary column with objective coefficient `obj`.
    pub fn binary(&mut self, obj: f64) -> Col {
        self.n_cols += 1;
        self.pb.add_integer_column(obj, 0.0..=1.0)
    }

    /// Continuous column bounded by `bounds`.
    pub fn continuous<B: RangeBounds<f64>>(&mut self, obj: f64, bounds: B) -> Col {
        self.n_cols += 1;
        self.pb.add_column(obj, bounds)
    }

    /// `sum(terms) == rhs`
    pub fn equal(&mut self, rhs: f64, terms: Vec<(Col, f64)>) {
        self.n_rows += 1;
        self.pb.add_row(rhs..=rhs, terms);
    }

    /// `sum(terms) <= rhs`
    pub fn at_most(&mut self, rhs: f64, terms: Vec<(Col, f64)>) {
        self.n_rows += 1;
        self.pb.add_row(..=rhs, terms);
    }

    /// `sum(terms) >= rhs`
    pub fn at_least(&mut self, rhs: f64, terms: Vec<(Col, f64)>) {
        self.n_rows += 1;
        self.pb.add_row(rhs.., terms);
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Solves the problem, blocking until HiGHS terminates.
    pub fn solve(self, sense: Sense) -> Result<SolveResult, EngineError> {
        debug!(
            cols = self.n_cols,
            rows = self.n_rows,
            maximise = matches!(sense, Sense::Maximise),
            "solving MIP"
        );

        let mut model = self.pb.optimise(sense);
        model.make_quiet();
        let solved = model.solve();
        if has_optimum(solved.status())? {
            Ok(SolveResult::Optimal {
                objective: solved.objective_value(),
                solution: solved.get_solution(),
            })
        } else {
            Ok(SolveResult::Infeasible)
        }
    }
}

/// Sorts a HiGHS termination status: `Ok(true)` when a solution can be read,
/// `Ok(false)` when the model is infeasible, a backend error otherwise.
///
/// Every model here is bounded, so `UnboundedOrInfeasible` can only mean
/// infeasible. A plain `Unbounded` is a malformed model and stays an error.
fn has_optimum(status: HighsModelStatus) -> Result<bool, EngineError> {
    match status {
        HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => Ok(true),
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => Ok(false),
        other => {
            warn!(status = ?other, "HiGHS returned non-optimal status");
            Err(EngineError::Backend(other))
        }
    }
}

/// Reads a binary column.
pub fn is_set(solution: &Solution, col: Col) -> bool {
    solution[col] > BINARY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knapsack_like_maximization() {
        // max 3a + 2b + 4c, a + b + c = 2
        let mut mip = MipBuilder::new();
        let a = mip.binary(3.0);
        let b = mip.binary(2.0);
        let c = mip.binary(4.0);
        mip.equal(2.0, vec![(a, 1.0), (b, 1.0), (c, 1.0)]);
        assert_eq!((mip.n_cols(), mip.n_rows()), (3, 1));

        match mip.solve(Sense::Maximise).unwrap() {
            SolveResult::Optimal { objective, solution } => {
                assert!((objective - 7.0).abs() < 1e-6);
                assert!(is_set(&solution, a));
                assert!(!is_set(&solution, b));
                assert!(is_set(&solution, c));
            }
            SolveResult::Infeasible => panic!("expected optimal"),
        }
    }

    #[test]
    fn contradictory_rows_are_infeasible() {
        let mut mip = MipBuilder::new();
        let a = mip.binary(1.0);
        let b = mip.binary(1.0);
        mip.equal(3.0, vec![(a, 1.0), (b, 1.0)]);
        assert!(matches!(mip.solve(Sense::Maximise).unwrap(), SolveResult::Infeasible));
    }

    #[test]
    fn continuous_slack_tracks_lower_bound() {
        // min u, u >= a + b - 1, a = b = 1
        let mut mip = MipBuilder::new();
        let a = mip.binary(0.0);
        let b = mip.binary(0.0);
        let u = mip.continuous(1.0, 0.0..);
        mip.equal(1.0, vec![(a, 1.0)]);
        mip.equal(1.0, vec![(b, 1.0)]);
        mip.at_least(-1.0, vec![(u, 1.0), (a, -1.0), (b, -1.0)]);
        match mip.solve(Sense::Minimise).unwrap() {
            SolveResult::Optimal { solution, .. } => assert!((solution[u] - 1.0).abs() < 1e-6),
            SolveResult::Infeasible => panic!("expected optimal"),
        }
    }

    #[test]
    fn status_mapping_keeps_backend_failures_apart() {
        assert!(matches!(has_optimum(HighsModelStatus::Optimal), Ok(true)));
        assert!(matches!(has_optimum(HighsModelStatus::ModelEmpty), Ok(true)));
        assert!(matches!(has_optimum(HighsModelStatus::Infeasible), Ok(false)));
        assert!(matches!(has_optimum(HighsModelStatus::UnboundedOrInfeasible), Ok(false)));
        assert!(matches!(
            has_optimum(HighsModelStatus::Unbounded),
            Err(EngineError::Backend(HighsModelStatus::Unbounded))
        ));
        assert!(matches!(
            has_optimum(HighsModelStatus::ReachedTimeLimit),
            Err(EngineError::Backend(HighsModelStatus::ReachedTimeLimit))
        ));
    }

    #[test]
    fn unbounded_model_never_reads_as_optimal() {
        // max u, u >= 0. HiGHS reports either Unbounded (a backend error) or,
        // when presolve cannot tell the two apart, UnboundedOrInfeasible.
        let mut mip = MipBuilder::new();
        mip.continuous(1.0, 0.0..);
        match mip.solve(Sense::Maximise) {
            Err(EngineError::Backend(status)) => {
                assert!(matches!(status, HighsModelStatus::Unbounded))
            }
            Ok(SolveResult::Infeasible) => {}
            Ok(SolveResult::Optimal { objective, .. }) => {
                panic!("unbounded model solved with objective {objective}")
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
