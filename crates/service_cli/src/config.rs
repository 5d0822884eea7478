//! hestonpp configuration.
//!
//! Settings come from, in increasing priority:
//! 1. built-in defaults (the canonical Heston parameter set)
//! 2. a TOML file with optional `[model]` and `[simulation]` tables
//! 3. `HESTONPP_*` environment variables
//! 4. command line flags (applied by the individual commands)
//!
//! ```toml
//! [model]
//! kappa = 2.0
//! theta = 0.04
//! sigma = 0.3
//! rho = -0.7
//!
//! [simulation]
//! n_paths = 50000
//! n_steps = 252
//! scheme = "milstein"
//! seed = 42
//! ```

use std::path::Path;
use std::str::FromStr;

use pricer_models::models::HestonParams;
use pricer_pricing::mc::{Discretisation, HestonSimulationConfig, Measure, Scheme};
use serde::Deserialize;

use crate::{CliError, Result};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "hestonpp.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "HESTONPP_";

/// `[model]` table
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub kappa: f64,
    pub theta: f64,
    pub sigma: f64,
    pub rho: f64,
    pub phi: f64,
    pub v0: f64,
    pub s0: f64,
    pub mu: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        let p = HestonParams::default();
        Self {
            kappa: p.kappa(),
            theta: p.theta(),
            sigma: p.sigma(),
            rho: p.rho(),
            phi: p.phi(),
            v0: p.v0(),
            s0: p.s0(),
            mu: p.mu(),
            risk_free_rate: p.risk_free_rate(),
            dividend_yield: p.dividend_yield(),
        }
    }
}

impl ModelSection {
    /// Validated model parameters.
    pub fn to_params(&self) -> Result<HestonParams> {
        Ok(HestonParams::new(
            self.kappa,
            self.theta,
            self.sigma,
            self.rho,
            self.phi,
            self.v0,
            self.s0,
            self.mu,
            self.risk_free_rate,
            self.dividend_yield,
        )?)
    }
}

/// `[simulation]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    pub n_paths: usize,
    pub n_steps: usize,
    pub horizon: f64,
    pub discretisation: String,
    pub scheme: String,
    pub measure: String,
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            n_steps: 252,
            horizon: 1.0,
            discretisation: Discretisation::default().as_str().to_string(),
            scheme: Scheme::default().as_str().to_string(),
            measure: Measure::default().as_str().to_string(),
            seed: None,
        }
    }
}

impl SimulationSection {
    /// Validated simulation settings.
    pub fn to_config(&self) -> Result<HestonSimulationConfig> {
        let mut builder = HestonSimulationConfig::builder()
            .n_paths(self.n_paths)
            .n_steps(self.n_steps)
            .horizon(self.horizon)
            .discretisation(Discretisation::from_str(&self.discretisation)?)
            .scheme(Scheme::from_str(&self.scheme)?)
            .measure(Measure::from_str(&self.measure)?);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        Ok(builder.build()?)
    }
}

/// Complete hestonpp configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HestonppConfig {
    pub model: ModelSection,
    pub simulation: SimulationSection,
}

impl HestonppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the file at `path` with environment overrides applied.
    ///
    /// A missing file is only accepted for the default file name, in which
    /// case the built-in defaults are used.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration file");
            Self::from_file(path)?
        } else if path == Path::new(DEFAULT_CONFIG_FILE) {
            tracing::debug!("no configuration file, using defaults");
            Self::default()
        } else {
            return Err(CliError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration file not found: {}", path.display()),
            )));
        };
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `HESTONPP_<FIELD>` overrides returned by `lookup`.
    ///
    /// Field names are the upper-cased TOML keys, e.g. `HESTONPP_KAPPA` or
    /// `HESTONPP_N_PATHS`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let m = &mut self.model;
        override_value(&lookup, "KAPPA", &mut m.kappa)?;
        override_value(&lookup, "THETA", &mut m.theta)?;
        override_value(&lookup, "SIGMA", &mut m.sigma)?;
        override_value(&lookup, "RHO", &mut m.rho)?;
        override_value(&lookup, "PHI", &mut m.phi)?;
        override_value(&lookup, "V0", &mut m.v0)?;
        override_value(&lookup, "S0", &mut m.s0)?;
        override_value(&lookup, "MU", &mut m.mu)?;
        override_value(&lookup, "RISK_FREE_RATE", &mut m.risk_free_rate)?;
        override_value(&lookup, "DIVIDEND_YIELD", &mut m.dividend_yield)?;

        let s = &mut self.simulation;
        override_value(&lookup, "N_PATHS", &mut s.n_paths)?;
        override_value(&lookup, "N_STEPS", &mut s.n_steps)?;
        override_value(&lookup, "HORIZON", &mut s.horizon)?;
        override_value(&lookup, "DISCRETISATION", &mut s.discretisation)?;
        override_value(&lookup, "SCHEME", &mut s.scheme)?;
        override_value(&lookup, "MEASURE", &mut s.measure)?;
        override_value(&lookup, "SEED", &mut s.seed)?;

        Ok(self)
    }

    /// Validated model parameters.
    pub fn params(&self) -> Result<HestonParams> {
        self.model.to_params()
    }

    /// Validated simulation settings.
    pub fn simulation_config(&self) -> Result<HestonSimulationConfig> {
        self.simulation.to_config()
    }
}

/// Values settable from the environment.
trait EnvValue: Sized {
    fn parse_env(raw: &str) -> Option<Self>;
}

impl EnvValue for f64 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl EnvValue for usize {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl EnvValue for String {
    fn parse_env(raw: &str) -> Option<Self> {
        Some(raw.trim().to_string())
    }
}

impl EnvValue for Option<u64> {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(Some)
    }
}

fn override_value<F, T>(lookup: &F, field: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: EnvValue,
{
    let var = format!("{ENV_PREFIX}{field}");
    if let Some(raw) = lookup(&var) {
        *target = T::parse_env(&raw).ok_or(CliError::Env { var, value: raw })?;
    }
    Ok(())
}
