//! Run all four models side by side.
//!
//! Inputs are sanitized against both scenarios first, then the static,
//! baseline temporal, priority temporal and joint models are solved in
//! parallel. Each run builds its own HiGHS problem; nothing is shared
//! between them except the read-only inputs.

use serde::Serialize;
use tracing::info;

use crate::config::EngineConfig;
use crate::data::{LocationId, Scenario};
use crate::error::EngineError;
use crate::filter::{sanitize, Isolated};
use crate::locate::joint::{self, ShiftPlan};
use crate::locate::{static_coverage, temporal, Selection, Solution};

/// Results of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Locations the models were solved over.
    pub locations: Vec<LocationId>,
    pub isolated: Isolated,
    pub static_coverage: Solution<Selection>,
    pub temporal: Solution<Selection>,
    pub priority: Solution<Selection>,
    pub joint: Solution<ShiftPlan>,
}

impl Comparison {
    /// `(name, objective)` for every model, joint value reconciled.
    pub fn objectives(&self) -> [(&'static str, f64); 4] {
        [
            ("static_coverage", self.static_coverage.objective),
            ("temporal", self.temporal.objective),
            ("priority", self.priority.objective),
            ("joint", self.joint.objective),
        ]
    }
}

/// Sanitize `baseline` and `priority` together, then solve every model.
///
/// The static, temporal and joint models use the baseline scenario; the
/// priority run is the temporal model over the priority scenario.
pub fn compare(
    locations: &[LocationId],
    baseline: Scenario,
    priority: Scenario,
    config: &EngineConfig,
) -> Result<Comparison, EngineError> {
    config.validate()?;
    let clean = sanitize(locations, baseline, priority);
    let locs = &clean.locations;
    let base = &clean.standard;
    let prio = &clean.priority;

    let ((static_coverage, temporal), (priority, joint)) = rayon::join(
        || {
            rayon::join(
                || static_coverage::solve(locs, base, config),
                || temporal::solve(locs, base, config),
            )
        },
        || {
            rayon::join(
                || temporal::solve(locs, prio, config),
                || joint::solve(locs, base, config),
            )
        },
    );

    let comparison = Comparison {
        locations: clean.locations.clone(),
        isolated: clean.isolated.clone(),
        static_coverage: static_coverage?,
        temporal: temporal?,
        priority: priority?,
        joint: joint?,
    };

    for (model, objective) in comparison.objectives() {
        info!(model, objective, "comparison result");
    }
    Ok(comparison)
}
