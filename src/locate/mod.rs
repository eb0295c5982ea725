//! Patrol location models.
//!
//! - [`static_coverage`]: pick P sites maximizing staffed traffic volume
//! - [`temporal`]: shift value minus volume-weighted response cost
//! - [`joint`]: three shifts in one program with a reuse penalty
//! - [`reconcile`]: penalty-free value of a joint solve

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::LocationId;

pub mod compare;
mod formulation;
pub mod joint;
pub mod reconcile;
pub mod solver;
pub mod static_coverage;
pub mod temporal;

/// Terminal status of a model run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
}

/// Sites staffed in one shift and which of them answers each demand point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub sites: Vec<LocationId>,
    /// demand -> covering site
    pub assignments: BTreeMap<LocationId, LocationId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn contains(&self, loc: &LocationId) -> bool {
        self.sites.contains(loc)
    }
}

/// Result of one model run.
///
/// `objective` is always the true, penalty-free value and is 0 when the
/// model is infeasible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution<S> {
    pub status: SolveStatus,
    pub selection: S,
    pub objective: f64,
}

impl<S: Default> Solution<S> {
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            selection: S::default(),
            objective: 0.0,
        }
    }
}

impl<S> Solution<S> {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}
