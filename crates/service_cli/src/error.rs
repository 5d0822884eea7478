//! Error types for the hestonpp command line.

use pricer_core::types::PricingError;
use pricer_pricing::mc::ConfigError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for the expected tables
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment override that does not parse
    #[error("Invalid environment override {var}={value}")]
    Env { var: String, value: String },

    /// Simulation settings rejected
    #[error("Simulation configuration error: {0}")]
    Simulation(#[from] ConfigError),

    /// Model or pricing failure
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// CSV output failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
