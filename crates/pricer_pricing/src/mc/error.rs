//! Error types for the Monte Carlo engine.
//!
//! Configuration problems are caught when a [`HestonSimulationConfig`] is
//! built, before any path is drawn.
//!
//! [`HestonSimulationConfig`]: super::HestonSimulationConfig

use pricer_core::types::PricingError;
use thiserror::Error;

/// Configuration error for the path simulator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Step count outside valid range [1, 10_000].
    #[error("Invalid step count {0}: must be in range [1, 10_000]")]
    InvalidStepCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        let name = match &err {
            ConfigError::InvalidPathCount(_) => "n_paths",
            ConfigError::InvalidStepCount(_) => "n_steps",
            ConfigError::InvalidParameter { name, .. } => *name,
        };
        PricingError::invalid(name, err.to_string())
    }
}
