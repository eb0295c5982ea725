//! Patrol unit location on a road network.
//!
//! Allocates P units to candidate sites so as to maximize coverage value:
//!
//! - [`filter`]: drop locations that lack a coverer in either of two
//!   coverage scenarios and prune every dependent table
//! - [`locate::static_coverage`]: staffed traffic volume, feasibility-only
//!   assignment
//! - [`locate::temporal`]: shift value minus response cost
//! - [`locate::joint`]: three shifts in one program, site reuse penalized
//! - [`locate::reconcile`]: penalty-free value of a joint solve
//! - [`locate::compare`]: every model in parallel on sanitized inputs
//!
//! Supporting modules: [`network`] derives traffic volumes and travel times
//! from a road graph, [`scenario`] draws seeded demand parameters.
//!
//! All models are solved with HiGHS. The library logs through `tracing` and
//! installs no subscriber.

pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod locate;
pub mod network;
pub mod scenario;

#[cfg(feature = "r")]
mod r;

pub use config::EngineConfig;
pub use data::{CoverageSets, LocationId, LocationValues, Scenario, TravelTimes};
pub use error::{ConfigError, EngineError};
pub use filter::{isolated_locations, sanitize, Isolated, Prune, Sanitized};
pub use locate::compare::{compare, Comparison};
pub use locate::joint::{Shift, ShiftPlan, SHIFTS};
pub use locate::reconcile::ReuseStats;
pub use locate::{Selection, Solution, SolveStatus};
