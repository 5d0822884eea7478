//! Integration tests for module exports.
//!
//! Verify that all public modules and types are reachable via absolute paths.

use approx::assert_relative_eq;
use proptest::prelude::*;

#[test]
fn test_types_module_exports() {
    use pricer_core::types::error::{PricingError, SolverError};
    use pricer_core::types::ensure_finite;

    let err = PricingError::invalid("strike", "must be positive");
    assert!(matches!(err, PricingError::InvalidParameter { .. }));
    let _ = SolverError::MaxIterationsExceeded { iterations: 1 };
    assert!(ensure_finite(&[0.0]).is_ok());
}

#[test]
fn test_quadrature_module_exports() {
    use pricer_core::math::quadrature::{GaussKronrod, QuadratureConfig, QuadratureResult};

    let gk = GaussKronrod::new(QuadratureConfig::fast()).unwrap();
    let result: QuadratureResult = gk
        .integrate(|x, out: &mut [f64]| out[0] = x, 0.0, 1.0, 1)
        .unwrap();
    assert_relative_eq!(result.values[0], 0.5, epsilon = 1e-14);
}

#[test]
fn test_solvers_module_exports() {
    use pricer_core::math::solvers::{BrentSolver, SolverConfig};

    let solver = BrentSolver::new(SolverConfig::high_precision());
    let root = solver.find_root(|x: f64| x - 0.25, 0.0, 1.0).unwrap();
    assert_relative_eq!(root, 0.25, epsilon = 1e-12);
}

/// Gaussian density over ±8σ integrates to one.
#[test]
fn test_gaussian_density_normalised() {
    use pricer_core::math::quadrature::GaussKronrod;

    let norm = (2.0 * std::f64::consts::PI).sqrt();
    let (value, _) = GaussKronrod::with_defaults()
        .integrate_scalar(|x| (-0.5 * x * x).exp() / norm, -8.0, 8.0)
        .unwrap();
    assert_relative_eq!(value, 1.0, epsilon = 1e-12);
}

proptest! {
    /// ∫_0^T e^{-k x} dx = (1 - e^{-kT}) / k.
    #[test]
    fn prop_exponential_decay_integral(k in 0.01f64..50.0, t in 0.1f64..20.0) {
        use pricer_core::math::quadrature::GaussKronrod;

        let (value, _) = GaussKronrod::with_defaults()
            .integrate_scalar(|x| (-k * x).exp(), 0.0, t)
            .unwrap();
        let exact = (1.0 - (-k * t).exp()) / k;
        prop_assert!((value - exact).abs() <= 1e-7 * exact.abs());
    }

    /// Brent recovers the root of a shifted cubic anywhere in the bracket.
    #[test]
    fn prop_brent_recovers_cubic_root(r in -5.0f64..5.0) {
        use pricer_core::math::solvers::BrentSolver;

        let root = BrentSolver::with_defaults()
            .find_root(|x: f64| x * x * x - r * r * r, -6.0, 6.0)
            .unwrap();
        prop_assert!((root - r).abs() < 1e-3);
    }
}
