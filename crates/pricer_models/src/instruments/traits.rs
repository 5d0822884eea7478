//! Pricing capability traits.
//!
//! Pricers are plain structs used through generics; the traits only fix the
//! batch-in, batch-out contract:
//!
//! - input is an ordered slice of [`OptionSpec`]
//! - output has the same length and order
//! - inputs are validated before any numerical work, so an `Err` means no
//!   partial output was produced
//! - an empty slice yields an empty vector

use pricer_core::types::PricingError;

use super::vanilla::OptionSpec;

/// Batch present-value pricing.
///
/// # Examples
///
/// ```
/// use pricer_core::types::PricingError;
/// use pricer_models::instruments::{OptionPricer, OptionSpec};
///
/// /// Prices every option at its intrinsic value.
/// struct Intrinsic {
///     spot: f64,
/// }
///
/// impl OptionPricer for Intrinsic {
///     fn npv(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
///         Ok(options
///             .iter()
///             .map(|o| o.payoff(o.effective_spot(self.spot)))
///             .collect())
///     }
/// }
///
/// let pricer = Intrinsic { spot: 110.0 };
/// let options = [OptionSpec::call(100.0, 1.0).unwrap()];
/// assert_eq!(pricer.npv(&options).unwrap(), vec![10.0]);
/// ```
pub trait OptionPricer {
    /// Present value of each option.
    fn npv(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError>;

    /// Present value of a single option.
    fn npv_one(&self, option: &OptionSpec) -> Result<f64, PricingError> {
        let values = self.npv(std::slice::from_ref(option))?;
        values
            .first()
            .copied()
            .ok_or(PricingError::ShapeMismatch {
                expected: 1,
                actual: 0,
            })
    }
}

/// First and second order sensitivities.
pub trait OptionGreeks: OptionPricer {
    /// ∂V/∂S per option.
    fn delta(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError>;

    /// ∂²V/∂S² per option.
    fn gamma(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError>;

    /// Sensitivity to the volatility level per option.
    fn vega(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError>;
}
