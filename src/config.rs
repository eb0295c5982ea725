//! Engine configuration.
//!
//! The full set of tunables is the unit count, the shift length, the reuse
//! tolerance and the penalty margin of the joint model.
//!
//! ```
//! use patrolopt::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     units = 5
//!     shift_length = 8.0
//! "#).unwrap();
//!
//! assert_eq!(config.units, 5);
//! assert_eq!(config.penalty_margin, 1000.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Slack at or below this value is solver noise, not reuse.
pub const DEFAULT_REUSE_TOLERANCE: f64 = 1e-6;

/// Added to the gross upper bound to form the joint model's penalty weight.
pub const DEFAULT_PENALTY_MARGIN: f64 = 1000.0;

/// Parameters shared by every model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Sites that must be active per shift (P).
    pub units: usize,

    /// Converts a staffed site into gross coverage value.
    pub shift_length: f64,

    /// Reuse slack at or below this counts as zero.
    pub reuse_tolerance: f64,

    /// Safety margin added to the reuse penalty weight.
    pub penalty_margin: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            units: 1,
            shift_length: 8.0,
            reuse_tolerance: DEFAULT_REUSE_TOLERANCE,
            penalty_margin: DEFAULT_PENALTY_MARGIN,
        }
    }
}

impl EngineConfig {
    pub fn new(units: usize, shift_length: f64) -> Self {
        Self {
            units,
            shift_length,
            ..Self::default()
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_units(mut self, units: usize) -> Self {
        self.units = units;
        self
    }

    pub fn with_shift_length(mut self, shift_length: f64) -> Self {
        self.shift_length = shift_length;
        self
    }

    pub fn with_penalty_margin(mut self, margin: f64) -> Self {
        self.penalty_margin = margin;
        self
    }

    /// Rejects values no model can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.units == 0 {
            return Err(ConfigError::Invalid("units must be positive".into()));
        }
        if !self.shift_length.is_finite() || self.shift_length < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shift_length must be finite and non-negative, got {}",
                self.shift_length
            )));
        }
        if !self.reuse_tolerance.is_finite() || self.reuse_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "reuse_tolerance must be finite and non-negative, got {}",
                self.reuse_tolerance
            )));
        }
        if !self.penalty_margin.is_finite() || self.penalty_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "penalty_margin must be finite and non-negative, got {}",
                self.penalty_margin
            )));
        }
        Ok(())
    }
}

/// Converts a signed unit count from a foreign caller.
///
/// Negative counts are rejected here, naming the value; zero passes through
/// and is rejected by [`EngineConfig::validate`].
pub fn unit_count(n: i64) -> Result<usize, ConfigError> {
    usize::try_from(n)
        .map_err(|_| ConfigError::Invalid(format!("units must be non-negative, got {n}")))
}
