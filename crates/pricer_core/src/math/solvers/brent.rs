//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's bracketing root finder.
///
/// Keeps a sign-changing bracket `[b, c]` at all times and proposes either a
/// secant or an inverse quadratic interpolation step, falling back to
/// bisection whenever the proposal would not shrink the bracket fast enough.
/// Convergence is therefore guaranteed for any continuous function with a
/// valid initial bracket.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::BrentSolver;
///
/// let solver = BrentSolver::with_defaults();
/// let root = solver.find_root(|x: f64| x - x.cos(), 0.0, 1.0).unwrap();
/// assert!((root - root.cos()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` between `a` and `b`.
    ///
    /// The endpoints may be given in either order.
    ///
    /// # Errors
    ///
    /// * `SolverError::NoBracket` if `f(a)` and `f(b)` share a sign
    /// * `SolverError::NumericalInstability` if `f` returns NaN
    /// * `SolverError::MaxIterationsExceeded` if the iteration cap is hit
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        let three = two + T::one();
        let half = T::one() / two;
        let tol = self.config.tolerance;

        let (mut a, mut b) = (a, b);
        let (mut fa, mut fb) = (f(a), f(b));

        if fa.is_nan() || fb.is_nan() {
            return Err(SolverError::NumericalInstability(
                "objective returned NaN at a bracket endpoint".to_string(),
            ));
        }
        if fa == T::zero() {
            return Ok(a);
        }
        if fb == T::zero() {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let (mut c, mut fc) = (a, fa);
        let mut step = b - a;
        let mut prev_step = step;

        for _ in 0..self.config.max_iterations {
            // Re-establish the bracket [b, c] with b the best estimate.
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                step = b - a;
                prev_step = step;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = two * T::epsilon() * b.abs() + half * tol;
            let mid = half * (c - b);
            if mid.abs() <= tol1 || fb.abs() < tol {
                return Ok(b);
            }

            if prev_step.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (two * mid * s, T::one() - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * mid * q * (q - r) - (b - a) * (r - T::one())),
                        (q - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };
                if p > T::zero() {
                    q = -q;
                }
                p = p.abs();

                let bound = (three * mid * q - (tol1 * q).abs()).min((prev_step * q).abs());
                if two * p < bound {
                    prev_step = step;
                    step = p / q;
                } else {
                    step = mid;
                    prev_step = step;
                }
            } else {
                step = mid;
                prev_step = step;
            }

            a = b;
            fa = fb;
            b = if step.abs() > tol1 {
                b + step
            } else {
                b + tol1 * mid.signum()
            };
            fb = f(b);
            if fb.is_nan() {
                return Err(SolverError::NumericalInstability(format!(
                    "objective returned NaN at {}",
                    b.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}
