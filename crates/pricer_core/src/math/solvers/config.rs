//! Solver configuration types.

use crate::types::PricingError;
use num_traits::Float;

/// Convergence settings for root finders.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let strict = SolverConfig::new(1e-12, 200).unwrap();
/// assert_eq!(strict.max_iterations, 200);
/// assert!(SolverConfig::new(0.0_f64, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<T: Float> {
    /// Stop once the residual or the half-bracket falls below this value.
    pub tolerance: T,

    /// Iteration cap; exceeding it yields `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// `tolerance` 1e-10, `max_iterations` 100.
    fn default() -> Self {
        Self::preset(1e-10, 100)
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if `tolerance` is not a positive
    /// finite number or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Result<Self, PricingError> {
        if !(tolerance.is_finite() && tolerance > T::zero()) {
            return Err(PricingError::invalid(
                "tolerance",
                format!(
                    "must be positive and finite, got {}",
                    tolerance.to_f64().unwrap_or(f64::NAN)
                ),
            ));
        }
        if max_iterations == 0 {
            return Err(PricingError::invalid("max_iterations", "must be at least 1"));
        }
        Ok(Self {
            tolerance,
            max_iterations,
        })
    }

    /// `tolerance` 1e-14, `max_iterations` 500.
    pub fn high_precision() -> Self {
        Self::preset(1e-14, 500)
    }

    /// `tolerance` 1e-6, `max_iterations` 50.
    pub fn fast() -> Self {
        Self::preset(1e-6, 50)
    }

    fn preset(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance: T::from(tolerance).unwrap_or_else(T::epsilon),
            max_iterations,
        }
    }
}
