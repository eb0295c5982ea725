//! Error types for the location engine.

use highs::HighsModelStatus;
use thiserror::Error;

use crate::data::LocationId;

/// Errors raised while building or solving a location model.
///
/// Infeasibility is not an error: it is reported as
/// [`SolveStatus::Infeasible`](crate::locate::SolveStatus) with a zeroed result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("location {0} appears more than once in the active set")]
    DuplicateLocation(LocationId),

    #[error("no coverage set given for location {0}")]
    MissingCoverage(LocationId),

    #[error("coverage set of {demand} lists {coverer}, which is not an active location")]
    UnknownCoverer {
        demand: LocationId,
        coverer: LocationId,
    },

    #[error("no traffic volume for location {0}")]
    MissingVolume(LocationId),

    #[error("no travel time from {coverer} to demand {demand}")]
    MissingTravelTime {
        demand: LocationId,
        coverer: LocationId,
    },

    #[error("no event time for demand {0}")]
    MissingEventTime(LocationId),

    #[error("{what} for {location} must be finite and non-negative, got {value}")]
    InvalidValue {
        what: &'static str,
        location: LocationId,
        value: f64,
    },

    #[error("solver terminated without a usable answer: {0:?}")]
    Backend(HighsModelStatus),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
