//! Road network helpers: highway tags, per-node traffic estimates, segment
//! travel times and response times between locations.

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::data::{LocationId, LocationValues, TravelTimes};

/// Volume assumed for a node with no known road class.
pub const DEFAULT_TRAFFIC: f64 = 500.0;

/// Segments never take less than this many minutes.
pub const MIN_TRAVEL_MINUTES: f64 = 0.01;

/// Road class of a segment. Merged segments may carry several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighwayTag {
    Single(String),
    Many(Vec<String>),
}

impl HighwayTag {
    /// Every road class on the segment; a single tag is a one-element list.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        let kinds = match self {
            HighwayTag::Single(kind) => std::slice::from_ref(kind),
            HighwayTag::Many(kinds) => kinds.as_slice(),
        };
        kinds.iter().map(String::as_str)
    }
}

impl From<&str> for HighwayTag {
    fn from(kind: &str) -> Self {
        HighwayTag::Single(kind.to_owned())
    }
}

/// Estimated daily traffic for a road class.
pub fn traffic_estimate(kind: &str) -> Option<f64> {
    let vol = match kind {
        "motorway" => 18000.0,
        "motorway_link" => 9000.0,
        "primary" => 4000.0,
        "primary_link" => 2000.0,
        "secondary" => 1500.0,
        "secondary_link" => 1000.0,
        "tertiary" => 800.0,
        "residential" => 500.0,
        _ => return None,
    };
    Some(vol)
}

/// Default speed in km/h for a road class.
pub fn speed_kph(kind: &str) -> Option<f64> {
    let kph = match kind {
        "motorway" => 120.0,
        "motorway_link" => 80.0,
        "primary" => 100.0,
        "primary_link" => 65.0,
        "secondary" => 80.0,
        "secondary_link" => 50.0,
        "tertiary" => 50.0,
        "residential" => 40.0,
        _ => return None,
    };
    Some(kph)
}

/// Mean of all default speeds, used when no tag on a segment is known.
const FALLBACK_KPH: f64 = (120.0 + 80.0 + 100.0 + 65.0 + 80.0 + 50.0 + 50.0 + 40.0) / 8.0;

/// A directed road segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub highway: HighwayTag,
    pub length_m: f64,
}

impl RoadSegment {
    pub fn new(highway: impl Into<HighwayTag>, length_m: f64) -> Self {
        Self {
            highway: highway.into(),
            length_m,
        }
    }

    /// Travel time in minutes at the mean default speed of the segment's
    /// road classes.
    pub fn travel_minutes(&self) -> f64 {
        let speeds: Vec<f64> = self.highway.kinds().filter_map(speed_kph).collect();
        let kph = if speeds.is_empty() {
            FALLBACK_KPH
        } else {
            speeds.iter().sum::<f64>() / speeds.len() as f64
        };
        let minutes = self.length_m / (kph * 1000.0 / 60.0);
        minutes.max(MIN_TRAVEL_MINUTES)
    }

    /// Highest traffic estimate among the segment's road classes.
    pub fn traffic(&self) -> f64 {
        self.highway
            .kinds()
            .map(|k| traffic_estimate(k).unwrap_or(DEFAULT_TRAFFIC))
            .fold(DEFAULT_TRAFFIC, f64::max)
    }
}

/// Directed road graph keyed by location.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: DiGraph<LocationId, RoadSegment>,
    nodes: HashMap<LocationId, NodeIndex>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing one.
    pub fn add_location(&mut self, id: LocationId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.nodes.insert(id, idx);
        idx
    }

    pub fn add_segment(&mut self, from: LocationId, to: LocationId, segment: RoadSegment) {
        let a = self.add_location(from);
        let b = self.add_location(to);
        self.graph.add_edge(a, b, segment);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn segment_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Locations in insertion order.
    pub fn locations(&self) -> Vec<LocationId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// The largest weakly connected component as a new network. Ties go to
    /// the component containing the earliest inserted node.
    pub fn largest_weak_component(&self) -> RoadNetwork {
        let n = self.graph.node_count();
        let mut uf = UnionFind::<usize>::new(n);
        for edge in self.graph.edge_references() {
            uf.union(edge.source().index(), edge.target().index());
        }
        let labels = uf.into_labeling();

        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for &label in &labels {
            *sizes.entry(label).or_default() += 1;
        }
        let mut best: Option<(usize, usize)> = None;
        for &label in &labels {
            let size = sizes[&label];
            if best.map_or(true, |(_, s)| size > s) {
                best = Some((label, size));
            }
        }

        let mut out = RoadNetwork::new();
        let Some((best, _)) = best else {
            return out;
        };
        for idx in self.graph.node_indices() {
            if labels[idx.index()] == best {
                out.add_location(self.graph[idx].clone());
            }
        }
        for edge in self.graph.edge_references() {
            if labels[edge.source().index()] == best {
                out.add_segment(
                    self.graph[edge.source()].clone(),
                    self.graph[edge.target()].clone(),
                    edge.weight().clone(),
                );
            }
        }
        out
    }

    /// Per-node traffic volume: the highest estimate over the node's outgoing
    /// segments, never below [`DEFAULT_TRAFFIC`].
    pub fn traffic_volumes(&self) -> LocationValues {
        self.graph
            .node_indices()
            .map(|idx| {
                let vol = self
                    .graph
                    .edges(idx)
                    .map(|e| e.weight().traffic())
                    .fold(DEFAULT_TRAFFIC, f64::max);
                (self.graph[idx].clone(), vol)
            })
            .collect()
    }

    /// Shortest travel minutes for every reachable pair, keyed
    /// `time[demand][coverer]`: the time for a unit at `coverer` to drive to
    /// `demand`.
    pub fn response_times(&self) -> TravelTimes {
        let mut times: TravelTimes = BTreeMap::new();
        for origin in self.graph.node_indices() {
            let dist = dijkstra(&self.graph, origin, None, |e| e.weight().travel_minutes());
            for (target, minutes) in dist {
                times
                    .entry(self.graph[target].clone())
                    .or_default()
                    .insert(self.graph[origin].clone(), minutes);
            }
        }
        times
    }
}
