//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors specific to closed-form and transform pricers

use pricer_core::types::{PricingError, SolverError};
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Variants
/// - `InvalidVolatility`: Non-positive or non-finite volatility
/// - `InvalidSpot`: Non-positive spot price
/// - `InvalidRate`: Non-finite rate or yield
/// - `ImpliedVolatility`: Root search failed for a quote
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("-0.2"));
///
/// let pricing: PricingError = err.into();
/// assert!(matches!(pricing, PricingError::InvalidParameter { .. }));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility.
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Non-finite rate or yield.
    #[error("Invalid {name}: {value}")]
    InvalidRate {
        /// Which rate
        name: &'static str,
        /// The invalid value
        value: f64,
    },

    /// Implied volatility search failed.
    #[error("Implied volatility search failed for option {index}: {source}")]
    ImpliedVolatility {
        /// Position of the option in the batch
        index: usize,
        /// Underlying solver failure
        #[source]
        source: SolverError,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { volatility } => PricingError::invalid(
                "volatility",
                format!("must be positive and finite, got {}", volatility),
            ),
            AnalyticalError::InvalidSpot { spot } => {
                PricingError::invalid("spot", format!("must be positive and finite, got {}", spot))
            }
            AnalyticalError::InvalidRate { name, value } => {
                PricingError::invalid(name, format!("must be finite, got {}", value))
            }
            AnalyticalError::ImpliedVolatility { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
        }
    }
}
