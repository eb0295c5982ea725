//! Result reconciliation for the joint model.
//!
//! The solver's objective has `PenaltyWeight * sum_j u[j]` subtracted. That
//! penalty only steers the search away from reusing sites, so the reported
//! value adds it back.

use serde::Serialize;

/// Reuse of sites across shifts, read from the overlap slack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReuseStats {
    /// Sites whose slack exceeds the tolerance.
    pub count: usize,
    /// Sum of those slacks.
    pub amount: f64,
}

impl ReuseStats {
    /// Slack at or below `tolerance` is solver noise and counts as no reuse.
    pub fn from_slack<I>(slack: I, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        slack
            .into_iter()
            .filter(|&u| u > tolerance)
            .fold(Self::default(), |acc, u| Self {
                count: acc.count + 1,
                amount: acc.amount + u,
            })
    }

    pub fn any(&self) -> bool {
        self.count > 0
    }
}

/// `raw + amount * penalty_weight`.
pub fn true_objective(raw_objective: f64, reuse: &ReuseStats, penalty_weight: f64) -> f64 {
    raw_objective + reuse.amount * penalty_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_below_tolerance_is_not_reuse() {
        let stats = ReuseStats::from_slack([5e-7], 1e-6);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.amount, 0.0);
        assert!(!stats.any());
    }

    #[test]
    fn slack_above_tolerance_is_reuse() {
        let stats = ReuseStats::from_slack([2e-6], 1e-6);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.amount, 2e-6);
    }

    #[test]
    fn counts_sites_and_sums_amount() {
        let stats = ReuseStats::from_slack([0.0, 2.0, 1e-9, 1.0], 1e-6);
        assert_eq!(stats.count, 2);
        assert!((stats.amount - 3.0).abs() < 1e-12);
    }

    #[test]
    fn penalty_is_added_back() {
        let stats = ReuseStats { count: 4, amount: 8.0 };
        assert_eq!(true_objective(-100.0, &stats, 50.0), 300.0);
        assert_eq!(true_objective(42.0, &ReuseStats::default(), 50.0), 42.0);
    }
}
