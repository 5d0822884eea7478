//! Globally adaptive Gauss-Kronrod (G10/K21) quadrature for vector integrands.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::QuadratureConfig;
use crate::types::PricingError;

/// Kronrod abscissae on [0, 1]; odd indices are the 10-point Gauss nodes.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

/// Kronrod weights matching `XGK`.
const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_323_957_510,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// Gauss weights for `XGK[1], XGK[3], .., XGK[9]`.
const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Outcome of an adaptive integration.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureResult {
    /// Integral of each component.
    pub values: Vec<f64>,

    /// Summed L2 error estimate over all subintervals.
    pub error_estimate: f64,

    /// Number of bisections performed.
    pub subdivisions: usize,

    /// Whether the error target was met.
    pub converged: bool,
}

/// A subinterval with its local integral and error estimate.
#[derive(Debug, Clone)]
struct Segment {
    lower: f64,
    upper: f64,
    values: Vec<f64>,
    error: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.error.total_cmp(&other.error) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

/// Adaptive Gauss-Kronrod integrator.
///
/// Each subinterval is integrated with the 21-point Kronrod rule; the
/// embedded 10-point Gauss rule provides the error estimate
/// `‖(K - G)·h‖₂`. The subinterval with the largest error is bisected until
/// the summed error meets [`QuadratureConfig::target`] or the subinterval
/// budget is exhausted.
///
/// The integrand writes all components at one abscissa into the supplied
/// buffer, so an expensive shared factor is evaluated once per node for the
/// whole vector.
///
/// Non-finite integrand values are not rejected: they propagate into the
/// result, which is then reported as not converged.
///
/// # Example
///
/// ```
/// use pricer_core::math::quadrature::GaussKronrod;
///
/// let gk = GaussKronrod::with_defaults();
/// let result = gk
///     .integrate(
///         |x, out: &mut [f64]| {
///             out[0] = x.sin();
///             out[1] = x * x;
///         },
///         0.0,
///         std::f64::consts::PI,
///         2,
///     )
///     .unwrap();
///
/// assert!(result.converged);
/// assert!((result.values[0] - 2.0).abs() < 1e-12);
/// assert!((result.values[1] - std::f64::consts::PI.powi(3) / 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GaussKronrod {
    config: QuadratureConfig,
}

impl GaussKronrod {
    /// Create an integrator with the given configuration.
    pub fn new(config: QuadratureConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an integrator with [`QuadratureConfig::default`].
    pub fn with_defaults() -> Self {
        Self {
            config: QuadratureConfig::default(),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Integrate a `dim`-component integrand over `[a, b]`.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if a bound is not finite.
    pub fn integrate<F>(
        &self,
        mut f: F,
        a: f64,
        b: f64,
        dim: usize,
    ) -> Result<QuadratureResult, PricingError>
    where
        F: FnMut(f64, &mut [f64]),
    {
        if !a.is_finite() {
            return Err(PricingError::invalid("a", format!("must be finite, got {}", a)));
        }
        if !b.is_finite() {
            return Err(PricingError::invalid("b", format!("must be finite, got {}", b)));
        }

        if dim == 0 || a == b {
            return Ok(QuadratureResult {
                values: vec![0.0; dim],
                error_estimate: 0.0,
                subdivisions: 0,
                converged: true,
            });
        }

        let mut scratch = Scratch::new(dim);
        let first = scratch.rule(&mut f, a, b);

        let mut total = first.values.clone();
        let mut error = first.error;
        let mut heap = BinaryHeap::with_capacity(64);
        heap.push(first);

        let mut subdivisions = 0;
        let mut converged = error <= self.config.target(l2_norm(&total));

        while !converged && error.is_finite() && heap.len() < self.config.max_subdivisions {
            let Some(worst) = heap.pop() else {
                break;
            };
            let mid = 0.5 * (worst.lower + worst.upper);
            let left = scratch.rule(&mut f, worst.lower, mid);
            let right = scratch.rule(&mut f, mid, worst.upper);

            for (k, t) in total.iter_mut().enumerate() {
                *t += left.values[k] + right.values[k] - worst.values[k];
            }
            error += left.error + right.error - worst.error;

            heap.push(left);
            heap.push(right);
            subdivisions += 1;

            converged = error <= self.config.target(l2_norm(&total));
        }

        // Re-sum to drop the drift of the running updates.
        let mut values = vec![0.0; dim];
        let mut error_estimate = 0.0;
        for segment in heap.iter() {
            for (v, s) in values.iter_mut().zip(&segment.values) {
                *v += s;
            }
            error_estimate += segment.error;
        }
        let converged = error_estimate <= self.config.target(l2_norm(&values));

        Ok(QuadratureResult {
            values,
            error_estimate,
            subdivisions,
            converged,
        })
    }

    /// Integrate a scalar function over `[a, b]`.
    ///
    /// Returns the integral and its error estimate.
    pub fn integrate_scalar<F>(&self, mut f: F, a: f64, b: f64) -> Result<(f64, f64), PricingError>
    where
        F: FnMut(f64) -> f64,
    {
        let result = self.integrate(|x, out: &mut [f64]| out[0] = f(x), a, b, 1)?;
        Ok((result.values[0], result.error_estimate))
    }
}

/// Reusable evaluation buffers for one integration.
struct Scratch {
    point: Vec<f64>,
    kronrod: Vec<f64>,
    gauss: Vec<f64>,
}

impl Scratch {
    fn new(dim: usize) -> Self {
        Self {
            point: vec![0.0; dim],
            kronrod: vec![0.0; dim],
            gauss: vec![0.0; dim],
        }
    }

    /// Apply the G10/K21 pair on `[lower, upper]`.
    fn rule<F>(&mut self, f: &mut F, lower: f64, upper: f64) -> Segment
    where
        F: FnMut(f64, &mut [f64]),
    {
        let centre = 0.5 * (lower + upper);
        let half = 0.5 * (upper - lower);

        f(centre, &mut self.point);
        for (k, p) in self.point.iter().enumerate() {
            self.kronrod[k] = WGK[10] * p;
            self.gauss[k] = 0.0;
        }

        for j in 0..10 {
            let dx = half * XGK[j];
            let gauss_weight = if j % 2 == 1 { WG[j / 2] } else { 0.0 };

            for x in [centre - dx, centre + dx] {
                f(x, &mut self.point);
                for (k, p) in self.point.iter().enumerate() {
                    self.kronrod[k] += WGK[j] * p;
                    self.gauss[k] += gauss_weight * p;
                }
            }
        }

        let values: Vec<f64> = self.kronrod.iter().map(|k| k * half).collect();
        let error = self
            .kronrod
            .iter()
            .zip(&self.gauss)
            .map(|(k, g)| ((k - g) * half).powi(2))
            .sum::<f64>()
            .sqrt();

        Segment {
            lower,
            upper,
            values,
            error,
        }
    }
}

#[inline]
fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_weights_integrate_constant() {
        let kronrod: f64 = 2.0 * WGK[..10].iter().sum::<f64>() + WGK[10];
        let gauss: f64 = 2.0 * WG.iter().sum::<f64>();
        assert_relative_eq!(kronrod, 2.0, epsilon = 1e-14);
        assert_relative_eq!(gauss, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_polynomial_exact_on_single_segment() {
        let gk = GaussKronrod::with_defaults();
        let result = gk
            .integrate(|x, out: &mut [f64]| out[0] = x.powi(19), 0.0, 1.0, 1)
            .unwrap();
        assert_relative_eq!(result.values[0], 1.0 / 20.0, epsilon = 1e-15);
        assert_eq!(result.subdivisions, 0);
        assert!(result.converged);
    }

    #[test]
    fn test_vector_components_are_independent() {
        let gk = GaussKronrod::with_defaults();
        let result = gk
            .integrate(
                |x, out: &mut [f64]| {
                    out[0] = x.exp();
                    out[1] = 1.0 / (1.0 + x * x);
                    out[2] = 0.0;
                },
                0.0,
                1.0,
                3,
            )
            .unwrap();
        assert_relative_eq!(result.values[0], 1.0_f64.exp() - 1.0, epsilon = 1e-13);
        assert_relative_eq!(result.values[1], PI / 4.0, epsilon = 1e-13);
        assert_eq!(result.values[2], 0.0);
    }

    #[test]
    fn test_oscillatory_integrand_needs_subdivision() {
        let gk = GaussKronrod::with_defaults();
        let (value, error) = gk.integrate_scalar(|x| (50.0 * x).cos(), 0.0, 10.0).unwrap();
        assert_relative_eq!(value, (500.0_f64).sin() / 50.0, epsilon = 1e-10);
        assert!(error < 1e-8);
    }

    #[test]
    fn test_damped_sinc_tail() {
        // ∫_0^∞ sin(x)/x dx = π/2; the tail beyond 1000 contributes ~1e-3.
        let gk = GaussKronrod::with_defaults();
        let (value, _) = gk
            .integrate_scalar(|x| if x == 0.0 { 1.0 } else { x.sin() / x }, 0.0, 1000.0)
            .unwrap();
        assert!((value - PI / 2.0).abs() < 2e-3);
    }

    #[test]
    fn test_reversed_bounds_negate() {
        let gk = GaussKronrod::with_defaults();
        let (forward, _) = gk.integrate_scalar(|x| x.exp(), 0.0, 2.0).unwrap();
        let (backward, _) = gk.integrate_scalar(|x| x.exp(), 2.0, 0.0).unwrap();
        assert_relative_eq!(forward, -backward, epsilon = 1e-14);
    }

    #[test]
    fn test_empty_interval() {
        let gk = GaussKronrod::with_defaults();
        let result = gk
            .integrate(|_, out: &mut [f64]| out[0] = 1.0, 3.0, 3.0, 1)
            .unwrap();
        assert_eq!(result.values, vec![0.0]);
        assert!(result.converged);
    }

    #[test]
    fn test_zero_dimension() {
        let gk = GaussKronrod::with_defaults();
        let result = gk.integrate(|_, _: &mut [f64]| {}, 0.0, 1.0, 0).unwrap();
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_non_finite_bound_rejected() {
        let gk = GaussKronrod::with_defaults();
        assert!(gk.integrate_scalar(|x| x, 0.0, f64::INFINITY).is_err());
        assert!(gk.integrate_scalar(|x| x, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_nan_propagates_without_looping() {
        let gk = GaussKronrod::with_defaults();
        let result = gk
            .integrate(|_, out: &mut [f64]| out[0] = f64::NAN, 0.0, 1.0, 1)
            .unwrap();
        assert!(result.values[0].is_nan());
        assert!(!result.converged);
        assert_eq!(result.subdivisions, 0);
    }

    #[test]
    fn test_subdivision_limit_reports_non_convergence() {
        let config = QuadratureConfig::new(1e-200, 1e-15, 3).unwrap();
        let gk = GaussKronrod::new(config).unwrap();
        let result = gk
            .integrate(|x, out: &mut [f64]| out[0] = (200.0 * x).sin(), 0.0, 10.0, 1)
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.subdivisions, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = QuadratureConfig {
            abs_tolerance: -1.0,
            rel_tolerance: 1e-8,
            max_subdivisions: 10,
        };
        assert!(GaussKronrod::new(config).is_err());
    }
}
