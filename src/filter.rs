//! Coverage consistency filter
//!
//! Removes locations whose coverage set is empty in either of two scenarios
//! and prunes every per-location table so that no retained entry points at a
//! removed location.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::data::{LocationId, Scenario};

/// Locations dropped by the filter.
pub type Isolated = BTreeSet<LocationId>;

/// Splits `locations` into those covered in both scenarios and those that are
/// not. A location with no coverage entry at all counts as isolated.
///
/// Retained locations keep their input order.
pub fn isolated_locations(
    locations: &[LocationId],
    standard: &Scenario,
    priority: &Scenario,
) -> (Vec<LocationId>, Isolated) {
    let uncovered = |s: &Scenario, loc: &LocationId| s.coverage.get(loc).map_or(true, |c| c.is_empty());

    let isolated: Isolated = locations
        .iter()
        .filter(|&loc| uncovered(standard, loc) || uncovered(priority, loc))
        .cloned()
        .collect();
    let retained = locations
        .iter()
        .filter(|&loc| !isolated.contains(loc))
        .cloned()
        .collect();
    (retained, isolated)
}

/// A per-location table that can drop references to isolated locations.
///
/// Pruning consumes the table and returns the pruned one. Keys that are
/// already absent are skipped, so pruning twice is the same as pruning once.
pub trait Prune: Sized {
    fn prune(self, isolated: &Isolated) -> Self;
}

impl Prune for BTreeMap<LocationId, f64> {
    fn prune(mut self, isolated: &Isolated) -> Self {
        self.retain(|loc, _| !isolated.contains(loc));
        self
    }
}

impl Prune for BTreeMap<LocationId, BTreeSet<LocationId>> {
    fn prune(mut self, isolated: &Isolated) -> Self {
        self.retain(|loc, _| !isolated.contains(loc));
        for members in self.values_mut() {
            members.retain(|j| !isolated.contains(j));
        }
        self
    }
}

impl<V> Prune for BTreeMap<LocationId, BTreeMap<LocationId, V>> {
    fn prune(mut self, isolated: &Isolated) -> Self {
        self.retain(|loc, _| !isolated.contains(loc));
        for row in self.values_mut() {
            row.retain(|j, _| !isolated.contains(j));
        }
        self
    }
}

impl Prune for Scenario {
    fn prune(self, isolated: &Isolated) -> Self {
        if isolated.is_empty() {
            return self;
        }
        Scenario {
            coverage: self.coverage.prune(isolated),
            volumes: self.volumes.prune(isolated),
            travel_times: self.travel_times.prune(isolated),
            event_times: self.event_times.prune(isolated),
        }
    }
}

/// Output of [`sanitize`].
#[derive(Debug, Clone)]
pub struct Sanitized {
    pub locations: Vec<LocationId>,
    pub isolated: Isolated,
    pub standard: Scenario,
    pub priority: Scenario,
    /// Isolate-and-prune passes that removed something.
    pub rounds: usize,
}

/// Isolates and prunes until every retained location has a coverer in both
/// scenarios.
///
/// A single pass can leave a retained location whose only coverers were
/// isolated; the next pass removes it. Running this again on its own output
/// isolates nothing.
pub fn sanitize(locations: &[LocationId], standard: Scenario, priority: Scenario) -> Sanitized {
    let mut locations = locations.to_vec();
    let mut standard = standard;
    let mut priority = priority;
    let mut all_isolated = Isolated::new();
    let mut rounds = 0;

    loop {
        let (retained, isolated) = isolated_locations(&locations, &standard, &priority);
        if isolated.is_empty() {
            break;
        }
        rounds += 1;
        debug!(round = rounds, removed = isolated.len(), "pruning isolated locations");
        standard = standard.prune(&isolated);
        priority = priority.prune(&isolated);
        locations = retained;
        all_isolated.extend(isolated);
    }

    info!(
        retained = locations.len(),
        isolated = all_isolated.len(),
        rounds,
        "coverage consistency filter done"
    );
    Sanitized {
        locations,
        isolated: all_isolated,
        standard,
        priority,
        rounds,
    }
}
