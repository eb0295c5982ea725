//! Seeded demand parameters for simulation runs.
//!
//! Volumes, urgency weights and event times are drawn from a `ChaCha8Rng`, so
//! the same locations and seed always give the same tables. Generated tables
//! are memoized in a [`DemandCache`] keyed by a fingerprint of the inputs.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::data::{LocationId, LocationValues};

pub const DEFAULT_SEED: u64 = 42;

/// Randomly drawn demand-side inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandParameters {
    /// Integer volumes in [500, 3000].
    pub volumes: LocationValues,
    /// Weights in [0.25, 1.0].
    pub urgency: LocationValues,
    /// 10 or 20 minutes on scene.
    pub event_times: LocationValues,
}

impl DemandParameters {
    pub fn generate(locations: &[LocationId], seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let volumes = locations
            .iter()
            .map(|loc| (loc.clone(), rng.gen_range(500..=3000) as f64))
            .collect();
        let urgency = locations
            .iter()
            .map(|loc| (loc.clone(), rng.gen_range(0.25..=1.0)))
            .collect();
        let event_times = locations
            .iter()
            .map(|loc| (loc.clone(), if rng.gen_bool(0.5) { 10.0 } else { 20.0 }))
            .collect();

        Self {
            volumes,
            urgency,
            event_times,
        }
    }
}

/// Content fingerprint of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(locations: &[LocationId], seed: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        locations.hash(&mut hasher);
        seed.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Memoized [`DemandParameters`], one entry per fingerprint.
#[derive(Debug, Default)]
pub struct DemandCache {
    entries: HashMap<Fingerprint, Arc<DemandParameters>>,
}

impl DemandCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(&mut self, locations: &[LocationId], seed: u64) -> Arc<DemandParameters> {
        let key = Fingerprint::of(locations, seed);
        self.entries
            .entry(key)
            .or_insert_with(|| {
                debug!(locations = locations.len(), seed, "generating demand parameters");
                Arc::new(DemandParameters::generate(locations, seed))
            })
            .clone()
    }

    /// Drops one entry. Returns whether it was cached.
    pub fn invalidate(&mut self, key: Fingerprint) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
