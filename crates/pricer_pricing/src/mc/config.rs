//! Heston path simulation configuration.
//!
//! This module provides [`HestonSimulationConfig`], built and validated
//! through [`HestonSimulationConfigBuilder`], and the policy enums selecting
//! how the variance process is discretised and which drift is used.

use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Floor applied to the variance under [`Discretisation::Truncation`].
pub const VARIANCE_FLOOR: f64 = 1e-5;

/// How a negative variance step is repaired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Discretisation {
    /// Floor the variance at [`VARIANCE_FLOOR`].
    #[default]
    Truncation,
    /// Replace the variance by its absolute value.
    Reflection,
}

impl Discretisation {
    /// Apply the policy to a raw variance update.
    #[inline]
    pub fn apply(self, variance: f64) -> f64 {
        match self {
            Discretisation::Truncation => variance.max(VARIANCE_FLOOR),
            Discretisation::Reflection => variance.abs(),
        }
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Discretisation::Truncation => "truncation",
            Discretisation::Reflection => "reflection",
        }
    }
}

/// Variance update scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Euler-Maruyama step.
    Euler,
    /// Euler step plus the Milstein correction `σ²·dt·(Z² - 1)/4`.
    #[default]
    Milstein,
}

impl Scheme {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Euler => "euler",
            Scheme::Milstein => "milstein",
        }
    }
}

/// Probability measure of the simulated spot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Risk neutral: drift `r - q`.
    #[default]
    RiskNeutral,
    /// Real world: drift `mu - q`.
    RealWorld,
}

impl Measure {
    /// Short name (`rn` / `rw`).
    pub fn as_str(self) -> &'static str {
        match self {
            Measure::RiskNeutral => "rn",
            Measure::RealWorld => "rw",
        }
    }
}

fn unknown(name: &'static str, given: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        value: format!("unknown {} '{}': expected {}", name, given, expected),
    }
}

impl FromStr for Discretisation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncation" => Ok(Discretisation::Truncation),
            "reflection" => Ok(Discretisation::Reflection),
            _ => Err(unknown("discretisation", s, "truncation or reflection")),
        }
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Scheme::Euler),
            "milstein" => Ok(Scheme::Milstein),
            _ => Err(unknown("scheme", s, "milstein or euler")),
        }
    }
}

impl FromStr for Measure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rn" => Ok(Measure::RiskNeutral),
            "rw" => Ok(Measure::RealWorld),
            _ => Err(unknown("measure", s, "rn or rw")),
        }
    }
}

impl fmt::Display for Discretisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heston path simulation configuration.
///
/// Immutable once built. Use [`HestonSimulationConfig::builder`].
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{HestonSimulationConfig, Scheme};
///
/// let config = HestonSimulationConfig::builder()
///     .n_paths(10_000)
///     .n_steps(252)
///     .horizon(1.0)
///     .scheme("euler".parse().unwrap())
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.scheme(), Scheme::Euler);
/// assert!((config.dt() - 1.0 / 252.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HestonSimulationConfig {
    n_paths: usize,
    n_steps: usize,
    horizon: f64,
    discretisation: Discretisation,
    scheme: Scheme,
    measure: Measure,
    seed: Option<u64>,
}

impl HestonSimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> HestonSimulationConfigBuilder {
        HestonSimulationConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the simulated time span.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Returns the step size `horizon / n_steps`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.horizon / self.n_steps as f64
    }

    /// Returns the negative-variance policy.
    #[inline]
    pub fn discretisation(&self) -> Discretisation {
        self.discretisation
    }

    /// Returns the variance update scheme.
    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the simulation measure.
    #[inline]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Same configuration over another horizon.
    pub fn with_horizon(&self, horizon: f64) -> Result<Self, ConfigError> {
        let config = Self {
            horizon,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Same configuration under another measure.
    pub fn with_measure(&self, measure: Measure) -> Self {
        Self {
            measure,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    /// - `horizon` is not positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "horizon",
                value: format!("must be positive and finite, got {}", self.horizon),
            });
        }
        Ok(())
    }
}

/// Builder for [`HestonSimulationConfig`].
///
/// `n_paths`, `n_steps` and `horizon` are required; the policies default to
/// truncation, Milstein and risk neutral.
#[derive(Clone, Debug, Default)]
pub struct HestonSimulationConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    horizon: Option<f64>,
    discretisation: Discretisation,
    scheme: Scheme,
    measure: Measure,
    seed: Option<u64>,
}

impl HestonSimulationConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the simulated time span.
    #[inline]
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Sets the negative-variance policy.
    #[inline]
    pub fn discretisation(mut self, discretisation: Discretisation) -> Self {
        self.discretisation = discretisation;
        self
    }

    /// Sets the variance update scheme.
    #[inline]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the simulation measure.
    #[inline]
    pub fn measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required field is missing or invalid.
    pub fn build(self) -> Result<HestonSimulationConfig, ConfigError> {
        let missing = |name| ConfigError::InvalidParameter {
            name,
            value: "must be specified".to_string(),
        };

        let config = HestonSimulationConfig {
            n_paths: self.n_paths.ok_or_else(|| missing("n_paths"))?,
            n_steps: self.n_steps.ok_or_else(|| missing("n_steps"))?,
            horizon: self.horizon.ok_or_else(|| missing("horizon"))?,
            discretisation: self.discretisation,
            scheme: self.scheme,
            measure: self.measure,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HestonSimulationConfigBuilder {
        HestonSimulationConfig::builder()
            .n_paths(1000)
            .n_steps(252)
            .horizon(1.0)
    }

    #[test]
    fn test_builder_defaults() {
        let config = base().build().unwrap();
        assert_eq!(config.discretisation(), Discretisation::Truncation);
        assert_eq!(config.scheme(), Scheme::Milstein);
        assert_eq!(config.measure(), Measure::RiskNeutral);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_invalid_counts() {
        assert!(matches!(
            base().n_paths(0).build(),
            Err(ConfigError::InvalidPathCount(0))
        ));
        assert!(matches!(
            base().n_steps(MAX_STEPS + 1).build(),
            Err(ConfigError::InvalidStepCount(_))
        ));
    }

    #[test]
    fn test_invalid_horizon() {
        for horizon in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                base().horizon(horizon).build(),
                Err(ConfigError::InvalidParameter { name: "horizon", .. })
            ));
        }
    }

    #[test]
    fn test_missing_fields() {
        let result = HestonSimulationConfig::builder().n_paths(10).n_steps(10).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "horizon", .. })
        ));

        let result = HestonSimulationConfig::builder().n_steps(10).horizon(1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "n_paths", .. })
        ));
    }

    #[test]
    fn test_policy_names_parse() {
        assert_eq!("truncation".parse::<Discretisation>().unwrap(), Discretisation::Truncation);
        assert_eq!("Reflection".parse::<Discretisation>().unwrap(), Discretisation::Reflection);
        assert_eq!("euler".parse::<Scheme>().unwrap(), Scheme::Euler);
        assert_eq!("milstein".parse::<Scheme>().unwrap(), Scheme::Milstein);
        assert_eq!("rn".parse::<Measure>().unwrap(), Measure::RiskNeutral);
        assert_eq!("rw".parse::<Measure>().unwrap(), Measure::RealWorld);
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(matches!(
            "absorption".parse::<Discretisation>(),
            Err(ConfigError::InvalidParameter { name: "discretisation", .. })
        ));
        assert!(matches!(
            "rk4".parse::<Scheme>(),
            Err(ConfigError::InvalidParameter { name: "scheme", .. })
        ));
        assert!(matches!(
            "p".parse::<Measure>(),
            Err(ConfigError::InvalidParameter { name: "measure", .. })
        ));
    }

    #[test]
    fn test_display_round_trips_names() {
        for d in [Discretisation::Truncation, Discretisation::Reflection] {
            assert_eq!(d.to_string().parse::<Discretisation>().unwrap(), d);
        }
        for m in [Measure::RiskNeutral, Measure::RealWorld] {
            assert_eq!(m.to_string().parse::<Measure>().unwrap(), m);
        }
    }

    #[test]
    fn test_discretisation_apply() {
        assert_eq!(Discretisation::Truncation.apply(-0.3), VARIANCE_FLOOR);
        assert_eq!(Discretisation::Truncation.apply(0.04), 0.04);
        assert_eq!(Discretisation::Reflection.apply(-0.3), 0.3);
    }

    #[test]
    fn test_with_horizon_revalidates() {
        let config = base().build().unwrap();
        assert_eq!(config.with_horizon(2.0).unwrap().horizon(), 2.0);
        assert!(config.with_horizon(0.0).is_err());
    }
}
