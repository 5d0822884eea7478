//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors raised at the boundary of pricing and simulation operations
//! - `SolverError`: Errors from root-finding solvers
//! - `ensure_finite`: Opt-in validation of numerical outputs

use thiserror::Error;

/// Categorised pricing errors.
///
/// Every pricing entry point validates its inputs before computing anything,
/// so a returned error always means that no partial output was produced.
///
/// # Variants
/// - `InvalidParameter`: An out-of-domain scalar or an unrecognised option name
/// - `ShapeMismatch`: Batch inputs whose lengths disagree
/// - `NumericalInstability`: A non-finite value found by [`ensure_finite`]
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::invalid("rho", "must lie in [-1, 1], got 1.5");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter 'rho': must lie in [-1, 1], got 1.5"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Out-of-domain scalar or unrecognised configuration value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Description of the violated constraint
        reason: String,
    },

    /// Batch inputs of disagreeing lengths.
    #[error("Shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Expected number of elements
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },

    /// Non-finite numerical output.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl PricingError {
    /// Create an `InvalidParameter` error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Fail with `ShapeMismatch` unless `actual == expected`.
    pub fn check_len(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { expected, actual })
        }
    }
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Check that every value of a pricer output is finite.
///
/// Pricers never inspect their own results: complex-branch discontinuities
/// or a non-converged integral surface as NaN or infinite prices. Callers that
/// need validated numbers run the output through this function.
///
/// # Examples
/// ```
/// use pricer_core::types::ensure_finite;
///
/// assert!(ensure_finite(&[1.0, 2.0]).is_ok());
/// assert!(ensure_finite(&[1.0, f64::NAN]).is_err());
/// ```
pub fn ensure_finite(values: &[f64]) -> Result<(), PricingError> {
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(index) => Err(PricingError::NumericalInstability(format!(
            "non-finite value {} at index {}",
            values[index], index
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = PricingError::invalid("kappa", "must be positive, got -1");
        assert_eq!(
            format!("{}", err),
            "Invalid parameter 'kappa': must be positive, got -1"
        );
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = PricingError::ShapeMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            format!("{}", err),
            "Shape mismatch: expected 3 elements, got 2"
        );
    }

    #[test]
    fn test_check_len() {
        assert!(PricingError::check_len(4, 4).is_ok());
        assert_eq!(
            PricingError::check_len(4, 5),
            Err(PricingError::ShapeMismatch {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_ensure_finite_reports_first_bad_index() {
        let err = ensure_finite(&[1.0, 2.0, f64::INFINITY, f64::NAN]).unwrap_err();
        match err {
            PricingError::NumericalInstability(msg) => assert!(msg.contains("index 2")),
            other => panic!("Expected NumericalInstability, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_finite_empty() {
        assert!(ensure_finite(&[]).is_ok());
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NoBracket { a: 1.0, b: 2.0 };
        assert_eq!(format!("{}", err), "No bracket: f(1) and f(2) have same sign");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::NumericalInstability("price[0] = NaN".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
