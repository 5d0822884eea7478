//! Black-Scholes-Merton pricing for European options.
//!
//! Serves as the lognormal reference for the Heston pricers: the limit
//! `sigma -> 0` of the stochastic-volatility model, and the quoting
//! convention for implied volatilities.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::types::{PricingError, SolverError};

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use crate::instruments::{OptionFlag, OptionGreeks, OptionPricer, OptionSpec};

/// Implied volatility search bracket.
const VOL_LOWER: f64 = 1e-6;
const VOL_UPPER: f64 = 10.0;

/// Black-Scholes-Merton model with a flat volatility.
///
/// Options carrying a spot override are priced against it; all others use
/// the model spot.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
/// use pricer_models::instruments::OptionFlag;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
/// let call = bs.price(100.0, 100.0, 1.0, OptionFlag::Call);
/// let put = bs.price(100.0, 100.0, 1.0, OptionFlag::Put);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot is not positive
    /// - `AnalyticalError::InvalidVolatility` if volatility is not positive
    /// - `AnalyticalError::InvalidRate` if a rate is not finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0, 0.05, 0.02, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0, 0.05, 0.0, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(
        spot: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, AnalyticalError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        if !risk_free_rate.is_finite() {
            return Err(AnalyticalError::InvalidRate {
                name: "risk_free_rate",
                value: risk_free_rate,
            });
        }
        if !dividend_yield.is_finite() {
            return Err(AnalyticalError::InvalidRate {
                name: "dividend_yield",
                value: dividend_yield,
            });
        }
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }

    /// Same model with another volatility.
    pub fn with_volatility(self, volatility: f64) -> Result<Self, AnalyticalError> {
        Self::new(
            self.spot,
            self.risk_free_rate,
            self.dividend_yield,
            volatility,
        )
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// d₁ at the model volatility. Requires `tau > 0`.
    #[inline]
    pub fn d1(&self, spot: f64, strike: f64, tau: f64) -> f64 {
        self.d1_at(spot, strike, tau, self.volatility)
    }

    /// d₂ = d₁ - σ√T. Requires `tau > 0`.
    #[inline]
    pub fn d2(&self, spot: f64, strike: f64, tau: f64) -> f64 {
        self.d1(spot, strike, tau) - self.volatility * tau.sqrt()
    }

    fn d1_at(&self, spot: f64, strike: f64, tau: f64, volatility: f64) -> f64 {
        let drift = self.risk_free_rate - self.dividend_yield + 0.5 * volatility * volatility;
        ((spot / strike).ln() + drift * tau) / (volatility * tau.sqrt())
    }

    fn price_at(&self, spot: f64, strike: f64, tau: f64, flag: OptionFlag, volatility: f64) -> f64 {
        if tau == 0.0 {
            return flag.intrinsic(spot, strike);
        }
        let d1 = self.d1_at(spot, strike, tau, volatility);
        let d2 = d1 - volatility * tau.sqrt();
        let forward_spot = spot * (-self.dividend_yield * tau).exp();
        let discounted_strike = strike * (-self.risk_free_rate * tau).exp();

        match flag {
            OptionFlag::Call => forward_spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            OptionFlag::Put => discounted_strike * norm_cdf(-d2) - forward_spot * norm_cdf(-d1),
        }
    }

    /// Option price at the model volatility.
    ///
    /// `tau == 0` returns intrinsic value.
    #[inline]
    pub fn price(&self, spot: f64, strike: f64, tau: f64, flag: OptionFlag) -> f64 {
        self.price_at(spot, strike, tau, flag, self.volatility)
    }

    /// Delta ∂V/∂S.
    ///
    /// - Call: e^(-qT)·N(d₁)
    /// - Put: e^(-qT)·(N(d₁) - 1)
    pub fn delta_at(&self, spot: f64, strike: f64, tau: f64, flag: OptionFlag) -> f64 {
        if tau == 0.0 {
            return match flag {
                OptionFlag::Call if spot > strike => 1.0,
                OptionFlag::Put if spot < strike => -1.0,
                _ => 0.0,
            };
        }
        let carry = (-self.dividend_yield * tau).exp();
        let n_d1 = norm_cdf(self.d1(spot, strike, tau));
        match flag {
            OptionFlag::Call => carry * n_d1,
            OptionFlag::Put => carry * (n_d1 - 1.0),
        }
    }

    /// Gamma ∂²V/∂S² = e^(-qT)·φ(d₁) / (S·σ·√T), identical for calls and puts.
    pub fn gamma_at(&self, spot: f64, strike: f64, tau: f64) -> f64 {
        if tau == 0.0 {
            return 0.0;
        }
        let carry = (-self.dividend_yield * tau).exp();
        carry * norm_pdf(self.d1(spot, strike, tau)) / (spot * self.volatility * tau.sqrt())
    }

    /// Vega ∂V/∂σ = S·e^(-qT)·√T·φ(d₁), identical for calls and puts.
    pub fn vega_at(&self, spot: f64, strike: f64, tau: f64) -> f64 {
        if tau == 0.0 {
            return 0.0;
        }
        let carry = (-self.dividend_yield * tau).exp();
        spot * carry * tau.sqrt() * norm_pdf(self.d1(spot, strike, tau))
    }

    /// Volatilities reproducing `quotes`, one per option.
    ///
    /// The model volatility is ignored. Quotes outside the no-arbitrage band
    /// `(max(±(S·e^(-qT) - K·e^(-rT)), 0), S·e^(-qT) or K·e^(-rT))`, and
    /// expired options, have no implied volatility and yield `NaN`.
    ///
    /// # Errors
    /// - `PricingError::ShapeMismatch` if `quotes.len() != options.len()`
    /// - `PricingError::NumericalInstability` if the root search fails to
    ///   converge for an attainable quote
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    /// use pricer_models::instruments::{OptionPricer, OptionSpec};
    ///
    /// let bs = BlackScholes::new(100.0, 0.01, 0.0, 0.25).unwrap();
    /// let options = [OptionSpec::call(110.0, 0.75).unwrap()];
    /// let quotes = bs.npv(&options).unwrap();
    ///
    /// let vols = bs.implied_volatility(&options, &quotes).unwrap();
    /// assert!((vols[0] - 0.25).abs() < 1e-8);
    /// ```
    pub fn implied_volatility(
        &self,
        options: &[OptionSpec],
        quotes: &[f64],
    ) -> Result<Vec<f64>, PricingError> {
        PricingError::check_len(options.len(), quotes.len())?;

        let solver = BrentSolver::new(SolverConfig::default());
        let mut vols = Vec::with_capacity(options.len());

        for (index, (option, &quote)) in options.iter().zip(quotes).enumerate() {
            let spot = option.effective_spot(self.spot);
            let (strike, tau, flag) = (option.strike(), option.tau(), option.flag());

            if tau == 0.0 || !quote.is_finite() {
                vols.push(f64::NAN);
                continue;
            }

            let forward_spot = spot * (-self.dividend_yield * tau).exp();
            let discounted_strike = strike * (-self.risk_free_rate * tau).exp();
            let lower = flag.intrinsic(forward_spot, discounted_strike);
            let upper = match flag {
                OptionFlag::Call => forward_spot,
                OptionFlag::Put => discounted_strike,
            };
            if quote <= lower || quote >= upper {
                tracing::debug!(index, quote, lower, upper, "quote outside arbitrage bounds");
                vols.push(f64::NAN);
                continue;
            }

            let objective = |vol: f64| self.price_at(spot, strike, tau, flag, vol) - quote;
            match solver.find_root(objective, VOL_LOWER, VOL_UPPER) {
                Ok(vol) => vols.push(vol),
                Err(SolverError::NoBracket { .. }) => {
                    tracing::debug!(index, quote, "implied volatility outside search bracket");
                    vols.push(f64::NAN);
                }
                Err(source) => {
                    return Err(AnalyticalError::ImpliedVolatility { index, source }.into());
                }
            }
        }

        Ok(vols)
    }
}

impl OptionPricer for BlackScholes {
    fn npv(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        Ok(options
            .iter()
            .map(|o| self.price(o.effective_spot(self.spot), o.strike(), o.tau(), o.flag()))
            .collect())
    }
}

impl OptionGreeks for BlackScholes {
    fn delta(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        Ok(options
            .iter()
            .map(|o| self.delta_at(o.effective_spot(self.spot), o.strike(), o.tau(), o.flag()))
            .collect())
    }

    fn gamma(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        Ok(options
            .iter()
            .map(|o| self.gamma_at(o.effective_spot(self.spot), o.strike(), o.tau()))
            .collect())
    }

    fn vega(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        Ok(options
            .iter()
            .map(|o| self.vega_at(o.effective_spot(self.spot), o.strike(), o.tau()))
            .collect())
    }
}
