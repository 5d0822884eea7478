//! European vanilla option requests.
//!
//! This module provides:
//! - [`OptionFlag`]: call/put selector with the `+1`/`-1` integer encoding
//! - [`OptionSpec`]: validated per-option pricing request

use std::fmt;

use pricer_core::types::PricingError;

/// Call/put selector.
///
/// Encoded as `+1` for calls and `-1` for puts; any other integer is
/// rejected.
///
/// # Examples
/// ```
/// use pricer_models::instruments::OptionFlag;
///
/// assert_eq!(OptionFlag::try_from(1).unwrap(), OptionFlag::Call);
/// assert_eq!(OptionFlag::try_from(-1).unwrap(), OptionFlag::Put);
/// assert!(OptionFlag::try_from(0).is_err());
/// assert_eq!(OptionFlag::Put.sign(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OptionFlag {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionFlag {
    /// `+1.0` for calls, `-1.0` for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            OptionFlag::Call => 1.0,
            OptionFlag::Put => -1.0,
        }
    }

    /// Payoff `max(sign * (spot - strike), 0)`.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        (self.sign() * (spot - strike)).max(0.0)
    }

    /// Whether this is a call.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionFlag::Call)
    }
}

impl TryFrom<i32> for OptionFlag {
    type Error = PricingError;

    fn try_from(flag: i32) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(OptionFlag::Call),
            -1 => Ok(OptionFlag::Put),
            other => Err(PricingError::invalid(
                "flag",
                format!("must be +1 (call) or -1 (put), got {}", other),
            )),
        }
    }
}

impl From<OptionFlag> for i32 {
    fn from(flag: OptionFlag) -> Self {
        match flag {
            OptionFlag::Call => 1,
            OptionFlag::Put => -1,
        }
    }
}

impl std::str::FromStr for OptionFlag {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionFlag::Call),
            "put" | "p" => Ok(OptionFlag::Put),
            other => Err(PricingError::invalid(
                "flag",
                format!("expected 'call' or 'put', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for OptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionFlag::Call => write!(f, "call"),
            OptionFlag::Put => write!(f, "put"),
        }
    }
}

/// European option pricing request.
///
/// Holds the contract terms plus optional per-option overrides of the
/// model's initial variance and spot. Validated on construction and
/// immutable afterwards.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{OptionFlag, OptionSpec};
///
/// let call = OptionSpec::call(100.0, 1.0).unwrap();
/// assert_eq!(call.flag(), OptionFlag::Call);
///
/// let put = OptionSpec::new(90.0, 0.5, OptionFlag::Put)
///     .and_then(|o| o.with_v0(0.09))
///     .unwrap();
/// assert_eq!(put.v0(), Some(0.09));
///
/// assert!(OptionSpec::call(0.0, 1.0).is_err());
/// assert!(OptionSpec::call(100.0, -0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptionSpec {
    strike: f64,
    tau: f64,
    flag: OptionFlag,
    v0: Option<f64>,
    spot: Option<f64>,
}

impl OptionSpec {
    /// Create a validated option.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `strike` is not positive or
    /// `tau` is negative (or either is not finite).
    pub fn new(strike: f64, tau: f64, flag: OptionFlag) -> Result<Self, PricingError> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(PricingError::invalid(
                "strike",
                format!("must be positive and finite, got {}", strike),
            ));
        }
        if !(tau.is_finite() && tau >= 0.0) {
            return Err(PricingError::invalid(
                "tau",
                format!("must be non-negative and finite, got {}", tau),
            ));
        }
        Ok(Self {
            strike,
            tau,
            flag,
            v0: None,
            spot: None,
        })
    }

    /// Create a call.
    pub fn call(strike: f64, tau: f64) -> Result<Self, PricingError> {
        Self::new(strike, tau, OptionFlag::Call)
    }

    /// Create a put.
    pub fn put(strike: f64, tau: f64) -> Result<Self, PricingError> {
        Self::new(strike, tau, OptionFlag::Put)
    }

    /// Override the initial variance used for this option.
    pub fn with_v0(self, v0: f64) -> Result<Self, PricingError> {
        if !(v0.is_finite() && v0 >= 0.0) {
            return Err(PricingError::invalid(
                "v0",
                format!("must be non-negative and finite, got {}", v0),
            ));
        }
        Ok(Self {
            v0: Some(v0),
            ..self
        })
    }

    /// Override the spot used for this option.
    pub fn with_spot(self, spot: f64) -> Result<Self, PricingError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(PricingError::invalid(
                "spot",
                format!("must be positive and finite, got {}", spot),
            ));
        }
        Ok(Self {
            spot: Some(spot),
            ..self
        })
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry in years.
    #[inline]
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Call/put flag.
    #[inline]
    pub fn flag(&self) -> OptionFlag {
        self.flag
    }

    /// Initial variance override, if any.
    #[inline]
    pub fn v0(&self) -> Option<f64> {
        self.v0
    }

    /// Spot override, if any.
    #[inline]
    pub fn spot(&self) -> Option<f64> {
        self.spot
    }

    /// Spot to price against: the override if set, else `default_spot`.
    #[inline]
    pub fn effective_spot(&self, default_spot: f64) -> f64 {
        self.spot.unwrap_or(default_spot)
    }

    /// Payoff at the given terminal spot.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        self.flag.intrinsic(spot, self.strike)
    }

    /// Moneyness `S/K` for calls, `K/S` for puts.
    pub fn moneyness(&self, default_spot: f64) -> f64 {
        let spot = self.effective_spot(default_spot);
        match self.flag {
            OptionFlag::Call => spot / self.strike,
            OptionFlag::Put => self.strike / spot,
        }
    }

    /// Natural log of [`moneyness`](Self::moneyness).
    pub fn log_moneyness(&self, default_spot: f64) -> f64 {
        self.moneyness(default_spot).ln()
    }

    /// Moneyness against the forward `S * exp(r * tau)`.
    pub fn forward_moneyness(&self, default_spot: f64, risk_free_rate: f64) -> f64 {
        let forward = self.effective_spot(default_spot) * (risk_free_rate * self.tau).exp();
        match self.flag {
            OptionFlag::Call => forward / self.strike,
            OptionFlag::Put => self.strike / forward,
        }
    }

    /// Natural log of [`forward_moneyness`](Self::forward_moneyness).
    pub fn log_forward_moneyness(&self, default_spot: f64, risk_free_rate: f64) -> f64 {
        self.forward_moneyness(default_spot, risk_free_rate).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flag_round_trip_through_integer() {
        for flag in [OptionFlag::Call, OptionFlag::Put] {
            assert_eq!(OptionFlag::try_from(i32::from(flag)).unwrap(), flag);
        }
        for bad in [0, 2, -2] {
            assert!(OptionFlag::try_from(bad).is_err());
        }
    }

    #[test]
    fn test_flag_from_str() {
        assert_eq!("CALL".parse::<OptionFlag>().unwrap(), OptionFlag::Call);
        assert_eq!("p".parse::<OptionFlag>().unwrap(), OptionFlag::Put);
        assert!("straddle".parse::<OptionFlag>().is_err());
        assert_eq!(OptionFlag::Put.to_string(), "put");
    }

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionFlag::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionFlag::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionFlag::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionFlag::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(OptionSpec::call(100.0, 0.0).is_ok());
        assert!(OptionSpec::call(-1.0, 1.0).is_err());
        assert!(OptionSpec::call(f64::NAN, 1.0).is_err());
        assert!(OptionSpec::put(100.0, f64::INFINITY).is_err());

        let option = OptionSpec::call(100.0, 1.0).unwrap();
        assert!(option.with_v0(-0.01).is_err());
        assert!(option.with_spot(0.0).is_err());
        assert!(option.with_v0(0.0).is_ok());
    }

    #[test]
    fn test_effective_spot() {
        let option = OptionSpec::call(100.0, 1.0).unwrap();
        assert_eq!(option.effective_spot(95.0), 95.0);
        assert_eq!(option.with_spot(105.0).unwrap().effective_spot(95.0), 105.0);
    }

    #[test]
    fn test_moneyness_call_and_put() {
        let call = OptionSpec::call(80.0, 1.0).unwrap();
        let put = OptionSpec::put(80.0, 1.0).unwrap();
        assert_relative_eq!(call.moneyness(100.0), 1.25, epsilon = 1e-15);
        assert_relative_eq!(put.moneyness(100.0), 0.8, epsilon = 1e-15);
        assert_relative_eq!(call.log_moneyness(100.0), -put.log_moneyness(100.0), epsilon = 1e-15);
    }

    #[test]
    fn test_forward_moneyness() {
        let call = OptionSpec::call(100.0, 2.0).unwrap();
        let fwd = 100.0 * (0.05_f64 * 2.0).exp();
        assert_relative_eq!(call.forward_moneyness(100.0, 0.05), fwd / 100.0, epsilon = 1e-14);
        assert_relative_eq!(call.log_forward_moneyness(100.0, 0.05), 0.1, epsilon = 1e-14);

        let put = OptionSpec::put(100.0, 2.0).unwrap();
        assert_relative_eq!(put.log_forward_moneyness(100.0, 0.05), -0.1, epsilon = 1e-14);
    }
}
