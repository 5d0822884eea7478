//! Quadrature configuration types.

use crate::types::PricingError;

/// Stopping rules for adaptive quadrature.
///
/// Subdivision stops once the summed error estimate satisfies
/// `error <= max(abs_tolerance, rel_tolerance * ‖integral‖₂)`, or when the
/// number of subintervals reaches `max_subdivisions`.
///
/// # Example
///
/// ```
/// use pricer_core::math::quadrature::QuadratureConfig;
///
/// let config = QuadratureConfig::default();
/// assert_eq!(config.rel_tolerance, 1e-8);
/// assert_eq!(config.max_subdivisions, 10_000);
///
/// let custom = QuadratureConfig::new(1e-12, 1e-10, 500).unwrap();
/// assert_eq!(custom.max_subdivisions, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureConfig {
    /// Absolute error target.
    pub abs_tolerance: f64,

    /// Error target relative to the L2 norm of the integral.
    pub rel_tolerance: f64,

    /// Upper bound on the number of subintervals.
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    /// Default values:
    /// - `abs_tolerance`: 1e-200 (effectively relative-only)
    /// - `rel_tolerance`: 1e-8
    /// - `max_subdivisions`: 10 000
    fn default() -> Self {
        Self {
            abs_tolerance: 1e-200,
            rel_tolerance: 1e-8,
            max_subdivisions: 10_000,
        }
    }
}

impl QuadratureConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if a tolerance is negative or not
    /// finite, if both tolerances are zero, or if `max_subdivisions == 0`.
    pub fn new(
        abs_tolerance: f64,
        rel_tolerance: f64,
        max_subdivisions: usize,
    ) -> Result<Self, PricingError> {
        let config = Self {
            abs_tolerance,
            rel_tolerance,
            max_subdivisions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Tight tolerances for reference values.
    pub fn high_precision() -> Self {
        Self {
            abs_tolerance: 1e-200,
            rel_tolerance: 1e-12,
            max_subdivisions: 50_000,
        }
    }

    /// Relaxed tolerances for interactive use.
    pub fn fast() -> Self {
        Self {
            abs_tolerance: 1e-10,
            rel_tolerance: 1e-6,
            max_subdivisions: 1_000,
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), PricingError> {
        for (name, value) in [
            ("abs_tolerance", self.abs_tolerance),
            ("rel_tolerance", self.rel_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::invalid(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        if self.abs_tolerance == 0.0 && self.rel_tolerance == 0.0 {
            return Err(PricingError::invalid(
                "abs_tolerance",
                "at least one tolerance must be positive",
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(PricingError::invalid(
                "max_subdivisions",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Error target for an integral of the given L2 norm.
    #[inline]
    pub fn target(&self, integral_norm: f64) -> f64 {
        self.abs_tolerance.max(self.rel_tolerance * integral_norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuadratureConfig::default();
        assert_eq!(config.abs_tolerance, 1e-200);
        assert_eq!(config.rel_tolerance, 1e-8);
        assert_eq!(config.max_subdivisions, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_ordered() {
        let fast = QuadratureConfig::fast();
        let default = QuadratureConfig::default();
        let precise = QuadratureConfig::high_precision();
        assert!(fast.rel_tolerance > default.rel_tolerance);
        assert!(precise.rel_tolerance < default.rel_tolerance);
        assert!(precise.max_subdivisions > default.max_subdivisions);
        assert!(fast.validate().is_ok());
        assert!(precise.validate().is_ok());
    }

    #[test]
    fn test_new_rejects_negative_tolerance() {
        let err = QuadratureConfig::new(-1.0, 1e-8, 10).unwrap_err();
        match err {
            PricingError::InvalidParameter { name, .. } => assert_eq!(name, "abs_tolerance"),
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_nan_tolerance() {
        assert!(QuadratureConfig::new(1e-10, f64::NAN, 10).is_err());
    }

    #[test]
    fn test_new_rejects_zero_tolerances() {
        assert!(QuadratureConfig::new(0.0, 0.0, 10).is_err());
    }

    #[test]
    fn test_new_rejects_zero_subdivisions() {
        assert!(QuadratureConfig::new(1e-10, 1e-8, 0).is_err());
    }

    #[test]
    fn test_target_uses_larger_bound() {
        let config = QuadratureConfig::new(1e-6, 1e-3, 10).unwrap();
        assert_eq!(config.target(0.0), 1e-6);
        assert_eq!(config.target(10.0), 1e-2);
    }
}
