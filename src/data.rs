//! Location identifiers and the keyed input tables the models consume.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Identifier of a site. Every location is both a candidate and a demand point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LocationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for LocationId {
    fn from(osmid: u64) -> Self {
        Self(osmid.to_string())
    }
}

/// Demand location -> candidates allowed to cover it.
pub type CoverageSets = BTreeMap<LocationId, BTreeSet<LocationId>>;

/// Per-location weight (traffic volume, event time).
pub type LocationValues = BTreeMap<LocationId, f64>;

/// `time[demand][coverer]`.
pub type TravelTimes = BTreeMap<LocationId, BTreeMap<LocationId, f64>>;

/// One consistent set of inputs over the same location keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub coverage: CoverageSets,
    pub volumes: LocationValues,
    pub travel_times: TravelTimes,
    pub event_times: LocationValues,
}

impl Scenario {
    /// Builds a scenario from per-location vectors aligned with `locations`
    /// and a coverage edge list `(demand, coverer, travel minutes)`.
    ///
    /// Every location gets a coverage entry, empty if no edge names it as
    /// the demand point. Short value vectors leave the trailing locations
    /// without a value, which [`Scenario::check`] then reports.
    pub fn from_edges<I>(
        locations: &[LocationId],
        volumes: &[f64],
        event_times: Option<&[f64]>,
        edges: I,
    ) -> Self
    where
        I: IntoIterator<Item = (LocationId, LocationId, Option<f64>)>,
    {
        let mut s = Scenario::default();
        for (k, loc) in locations.iter().enumerate() {
            s.coverage.entry(loc.clone()).or_default();
            if let Some(&v) = volumes.get(k) {
                s.volumes.insert(loc.clone(), v);
            }
            if let Some(&e) = event_times.and_then(|e| e.get(k)) {
                s.event_times.insert(loc.clone(), e);
            }
        }
        for (demand, coverer, travel) in edges {
            if let Some(t) = travel {
                s.travel_times
                    .entry(demand.clone())
                    .or_default()
                    .insert(coverer.clone(), t);
            }
            s.coverage.entry(demand).or_default().insert(coverer);
        }
        s
    }

    /// Coverage as `(demand, coverer)` pairs, ordered by demand then coverer.
    pub fn coverage_edges(&self) -> impl Iterator<Item = (&LocationId, &LocationId)> + '_ {
        self.coverage
            .iter()
            .flat_map(|(demand, cov)| cov.iter().map(move |coverer| (demand, coverer)))
    }

    /// Priority variant: every volume scaled by its location's urgency.
    /// Locations without an urgency keep their volume.
    pub fn with_urgency(&self, urgency: &LocationValues) -> Self {
        let volumes = self
            .volumes
            .iter()
            .map(|(loc, &v)| (loc.clone(), v * urgency.get(loc).copied().unwrap_or(1.0)))
            .collect();
        Self {
            volumes,
            ..self.clone()
        }
    }

    pub fn volume(&self, loc: &LocationId) -> Result<f64, EngineError> {
        self.volumes
            .get(loc)
            .copied()
            .ok_or_else(|| EngineError::MissingVolume(loc.clone()))
    }

    pub fn coverage_of(&self, demand: &LocationId) -> Result<&BTreeSet<LocationId>, EngineError> {
        self.coverage
            .get(demand)
            .ok_or_else(|| EngineError::MissingCoverage(demand.clone()))
    }

    /// `time[demand][coverer] + event[demand]`.
    pub fn response_time(
        &self,
        demand: &LocationId,
        coverer: &LocationId,
    ) -> Result<f64, EngineError> {
        let travel = self
            .travel_times
            .get(demand)
            .and_then(|row| row.get(coverer))
            .copied()
            .ok_or_else(|| EngineError::MissingTravelTime {
                demand: demand.clone(),
                coverer: coverer.clone(),
            })?;
        let event = self
            .event_times
            .get(demand)
            .copied()
            .ok_or_else(|| EngineError::MissingEventTime(demand.clone()))?;
        Ok(travel + event)
    }

    /// Checks the caller contract for a solve over `locations`.
    ///
    /// Every location needs a coverage set and a volume, every coverer must be
    /// active, and with `timed` every pair needs a travel time and every demand
    /// an event time. Numbers must be finite and non-negative.
    pub fn check(&self, locations: &[LocationId], timed: bool) -> Result<(), EngineError> {
        let mut active: HashSet<&LocationId> = HashSet::with_capacity(locations.len());
        for loc in locations {
            if !active.insert(loc) {
                return Err(EngineError::DuplicateLocation(loc.clone()));
            }
        }

        for demand in locations {
            non_negative("traffic volume", demand, self.volume(demand)?)?;
            for coverer in self.coverage_of(demand)? {
                if !active.contains(coverer) {
                    return Err(EngineError::UnknownCoverer {
                        demand: demand.clone(),
                        coverer: coverer.clone(),
                    });
                }
                if timed {
                    non_negative("response time", demand, self.response_time(demand, coverer)?)?;
                }
            }
            if timed {
                let event = self
                    .event_times
                    .get(demand)
                    .copied()
                    .ok_or_else(|| EngineError::MissingEventTime(demand.clone()))?;
                non_negative("event time", demand, event)?;
            }
        }
        Ok(())
    }
}

fn non_negative(what: &'static str, location: &LocationId, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidValue {
            what,
            location: location.clone(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<LocationId> {
        names.iter().map(|&n| LocationId::from(n)).collect()
    }

    fn pair_scenario() -> Scenario {
        let mut s = Scenario::default();
        for (name, vol) in [("A", 10.0), ("B", 5.0)] {
            s.volumes.insert(name.into(), vol);
            s.event_times.insert(name.into(), 1.0);
        }
        s.coverage.insert("A".into(), ["A", "B"].iter().map(|&n| n.into()).collect());
        s.coverage.insert("B".into(), ["B"].iter().map(|&n| n.into()).collect());
        let a = LocationId::from("A");
        let b = LocationId::from("B");
        s.travel_times
            .insert(a.clone(), [(a.clone(), 0.0), (b.clone(), 3.0)].into_iter().collect());
        s.travel_times.insert(b.clone(), [(b, 0.0)].into_iter().collect());
        s
    }

    #[test]
    fn consistent_scenario_passes() {
        let s = pair_scenario();
        assert!(s.check(&ids(&["A", "B"]), true).is_ok());
    }

    #[test]
    fn coverer_outside_active_set_fails_fast() {
        let s = pair_scenario();
        let err = s.check(&ids(&["A"]), false).unwrap_err();
        assert!(matches!(err, EngineError::UnknownCoverer { .. }));
    }

    #[test]
    fn missing_travel_time_fails_fast() {
        let mut s = pair_scenario();
        s.travel_times.get_mut(&LocationId::from("A")).unwrap().remove(&LocationId::from("B"));
        assert!(s.check(&ids(&["A", "B"]), false).is_ok());
        let err = s.check(&ids(&["A", "B"]), true).unwrap_err();
        assert!(matches!(err, EngineError::MissingTravelTime { .. }));
    }

    #[test]
    fn negative_volume_rejected() {
        let mut s = pair_scenario();
        s.volumes.insert("B".into(), -1.0);
        let err = s.check(&ids(&["A", "B"]), false).unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue { what: "traffic volume", .. }));
    }

    #[test]
    fn duplicate_location_rejected() {
        let s = pair_scenario();
        let err = s.check(&ids(&["A", "B", "A"]), false).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateLocation(_)));
    }

    #[test]
    fn edge_lists_rebuild_the_scenario() {
        let locs = ids(&["A", "B"]);
        let edges = vec![
            (LocationId::from("A"), LocationId::from("A"), Some(0.0)),
            (LocationId::from("A"), LocationId::from("B"), Some(3.0)),
            (LocationId::from("B"), LocationId::from("B"), Some(0.0)),
        ];
        let s = Scenario::from_edges(&locs, &[10.0, 5.0], Some(&[1.0, 1.0][..]), edges);
        assert_eq!(s, pair_scenario());

        let pairs: Vec<(&str, &str)> = s
            .coverage_edges()
            .map(|(i, j)| (i.as_str(), j.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "A"), ("A", "B"), ("B", "B")]);
    }

    #[test]
    fn location_without_edges_gets_empty_coverage() {
        let locs = ids(&["A", "B"]);
        let edges = vec![(LocationId::from("A"), LocationId::from("A"), None)];
        let s = Scenario::from_edges(&locs, &[1.0], None, edges);
        assert!(s.coverage[&LocationId::from("B")].is_empty());
        assert!(s.travel_times.is_empty());
        assert!(matches!(
            s.check(&locs, false).unwrap_err(),
            EngineError::MissingVolume(_)
        ));
    }

    #[test]
    fn urgency_scales_volumes() {
        let s = pair_scenario();
        let urgency: LocationValues = [("A".into(), 0.5)].into_iter().collect();
        let p = s.with_urgency(&urgency);
        assert_eq!(p.volumes[&LocationId::from("A")], 5.0);
        assert_eq!(p.volumes[&LocationId::from("B")], 5.0);
        assert_eq!(p.coverage, s.coverage);
    }
}
