//! Heston++ stochastic volatility model parameters.
//!
//! The model is described by the SDEs
//! ```text
//! dS = (r - q) * S * dt + sqrt(V + phi) * S * dW_S
//! dV = kappa * (theta - V) * dt + sigma * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * sqrt(V / (V + phi)) * dt
//! ```
//! where:
//! - S = asset price
//! - V = instantaneous variance
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - sigma = volatility of variance (vol-of-vol)
//! - rho = spot/variance correlation
//! - phi = constant variance added to the spot diffusion
//!
//! `phi = 0` recovers the classical Heston model.
//!
//! ## Feller condition
//!
//! The variance process stays strictly positive when
//! ```text
//! 2 * kappa * theta > sigma^2
//! ```
//! The condition is reported, never enforced.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::heston::HestonParams;
//!
//! let params = HestonParams::default()
//!     .with_kappa(1.5)
//!     .and_then(|p| p.with_phi(0.01))
//!     .unwrap();
//! assert_eq!(params.kappa(), 1.5);
//! assert!(params.satisfies_feller()); // 2 * 1.5 * 0.04 = 0.12 > 0.09
//! ```

use pricer_core::types::PricingError;

/// Heston++ model coefficients and pricing environment.
///
/// Immutable once constructed: every constructor and `with_*` method
/// validates the full parameter set.
///
/// # Fields
///
/// * `kappa` - mean-reversion speed (> 0)
/// * `theta` - long-run variance (>= 0)
/// * `sigma` - vol-of-vol (>= 0)
/// * `rho` - correlation in [-1, 1]
/// * `phi` - extension variance (>= 0)
/// * `v0` - initial variance (>= 0)
/// * `s0` - initial spot (> 0)
/// * `mu` - real-world drift (finite)
/// * `risk_free_rate` - continuously compounded rate (finite)
/// * `dividend_yield` - continuous dividend yield (finite)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawHestonParams", into = "RawHestonParams")
)]
pub struct HestonParams {
    kappa: f64,
    theta: f64,
    sigma: f64,
    rho: f64,
    phi: f64,
    v0: f64,
    s0: f64,
    mu: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
}

impl HestonParams {
    /// Create a validated parameter set.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` naming the first offending field.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// let params = HestonParams::new(2.0, 0.04, 0.3, -0.7, 0.0, 0.04, 100.0, 0.0, 0.0, 0.0);
    /// assert!(params.is_ok());
    ///
    /// let invalid = HestonParams::new(2.0, 0.04, 0.3, -1.5, 0.0, 0.04, 100.0, 0.0, 0.0, 0.0);
    /// assert!(invalid.is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kappa: f64,
        theta: f64,
        sigma: f64,
        rho: f64,
        phi: f64,
        v0: f64,
        s0: f64,
        mu: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
    ) -> Result<Self, PricingError> {
        let params = Self {
            kappa,
            theta,
            sigma,
            rho,
            phi,
            v0,
            s0,
            mu,
            risk_free_rate,
            dividend_yield,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<(), PricingError> {
        positive("kappa", self.kappa)?;
        non_negative("theta", self.theta)?;
        non_negative("sigma", self.sigma)?;
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(PricingError::invalid(
                "rho",
                format!("must lie in [-1, 1], got {}", self.rho),
            ));
        }
        non_negative("phi", self.phi)?;
        non_negative("v0", self.v0)?;
        positive("s0", self.s0)?;
        finite("mu", self.mu)?;
        finite("risk_free_rate", self.risk_free_rate)?;
        finite("dividend_yield", self.dividend_yield)?;
        Ok(())
    }

    /// Mean-reversion speed.
    #[inline]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Long-run variance.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Vol-of-vol.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Spot/variance correlation.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Extension variance.
    #[inline]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Initial variance.
    #[inline]
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// Initial spot.
    #[inline]
    pub fn s0(&self) -> f64 {
        self.s0
    }

    /// Real-world drift.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Risk-free rate.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Replace `kappa`.
    pub fn with_kappa(self, kappa: f64) -> Result<Self, PricingError> {
        Self { kappa, ..self }.validated()
    }

    /// Replace `theta`.
    pub fn with_theta(self, theta: f64) -> Result<Self, PricingError> {
        Self { theta, ..self }.validated()
    }

    /// Replace `sigma`.
    pub fn with_sigma(self, sigma: f64) -> Result<Self, PricingError> {
        Self { sigma, ..self }.validated()
    }

    /// Replace `rho`.
    pub fn with_rho(self, rho: f64) -> Result<Self, PricingError> {
        Self { rho, ..self }.validated()
    }

    /// Replace `phi`.
    pub fn with_phi(self, phi: f64) -> Result<Self, PricingError> {
        Self { phi, ..self }.validated()
    }

    /// Replace `v0`.
    pub fn with_v0(self, v0: f64) -> Result<Self, PricingError> {
        Self { v0, ..self }.validated()
    }

    /// Replace `s0`.
    pub fn with_s0(self, s0: f64) -> Result<Self, PricingError> {
        Self { s0, ..self }.validated()
    }

    /// Replace `mu`.
    pub fn with_mu(self, mu: f64) -> Result<Self, PricingError> {
        Self { mu, ..self }.validated()
    }

    /// Replace `risk_free_rate`.
    pub fn with_risk_free_rate(self, risk_free_rate: f64) -> Result<Self, PricingError> {
        Self {
            risk_free_rate,
            ..self
        }
        .validated()
    }

    /// Replace `dividend_yield`.
    pub fn with_dividend_yield(self, dividend_yield: f64) -> Result<Self, PricingError> {
        Self {
            dividend_yield,
            ..self
        }
        .validated()
    }

    fn validated(self) -> Result<Self, PricingError> {
        self.validate()?;
        Ok(self)
    }

    /// Check the Feller condition `2 * kappa * theta > sigma^2`.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // 2 * 2 * 0.04 = 0.16 > 0.09
    /// assert!(HestonParams::default().satisfies_feller());
    ///
    /// // 2 * 0.5 * 0.04 = 0.04 < 0.25
    /// let rough = HestonParams::default()
    ///     .with_kappa(0.5)
    ///     .and_then(|p| p.with_sigma(0.5))
    ///     .unwrap();
    /// assert!(!rough.satisfies_feller());
    /// ```
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.sigma * self.sigma
    }

    /// Feller ratio `2 * kappa * theta / sigma^2`; infinite when `sigma == 0`.
    pub fn feller_ratio(&self) -> f64 {
        let denominator = self.sigma * self.sigma;
        if denominator > 0.0 {
            2.0 * self.kappa * self.theta / denominator
        } else {
            f64::INFINITY
        }
    }

    /// Emit a warning when the Feller condition is violated.
    ///
    /// Returns whether the condition holds.
    pub fn warn_if_feller_violated(&self) -> bool {
        let satisfied = self.satisfies_feller();
        if !satisfied {
            tracing::warn!(
                kappa = self.kappa,
                theta = self.theta,
                sigma = self.sigma,
                feller_ratio = self.feller_ratio(),
                "Feller condition 2*kappa*theta > sigma^2 violated; variance can reach zero"
            );
        }
        satisfied
    }
}

impl Default for HestonParams {
    /// Canonical parameter set:
    /// - kappa = 2.0
    /// - theta = 0.04 (20% long-run vol)
    /// - sigma = 0.3
    /// - rho = -0.7
    /// - phi = 0.0
    /// - v0 = 0.04
    /// - s0 = 100.0
    /// - mu = risk_free_rate = dividend_yield = 0.0
    fn default() -> Self {
        Self {
            kappa: 2.0,
            theta: 0.04,
            sigma: 0.3,
            rho: -0.7,
            phi: 0.0,
            v0: 0.04,
            s0: 100.0,
            mu: 0.0,
            risk_free_rate: 0.0,
            dividend_yield: 0.0,
        }
    }
}

#[inline]
fn positive(name: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be positive and finite, got {}", value),
        ))
    }
}

#[inline]
fn non_negative(name: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be non-negative and finite, got {}", value),
        ))
    }
}

#[inline]
fn finite(name: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be finite, got {}", value),
        ))
    }
}

/// Unvalidated mirror used for deserialisation; missing fields take the
/// canonical defaults.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawHestonParams {
    kappa: f64,
    theta: f64,
    sigma: f64,
    rho: f64,
    phi: f64,
    v0: f64,
    s0: f64,
    mu: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
}

#[cfg(feature = "serde")]
impl Default for RawHestonParams {
    fn default() -> Self {
        HestonParams::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<HestonParams> for RawHestonParams {
    fn from(p: HestonParams) -> Self {
        Self {
            kappa: p.kappa,
            theta: p.theta,
            sigma: p.sigma,
            rho: p.rho,
            phi: p.phi,
            v0: p.v0,
            s0: p.s0,
            mu: p.mu,
            risk_free_rate: p.risk_free_rate,
            dividend_yield: p.dividend_yield,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawHestonParams> for HestonParams {
    type Error = PricingError;

    fn try_from(raw: RawHestonParams) -> Result<Self, Self::Error> {
        Self::new(
            raw.kappa,
            raw.theta,
            raw.sigma,
            raw.rho,
            raw.phi,
            raw.v0,
            raw.s0,
            raw.mu,
            raw.risk_free_rate,
            raw.dividend_yield,
        )
    }
}
