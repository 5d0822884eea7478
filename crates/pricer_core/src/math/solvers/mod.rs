//! Bracketing root finders.
//!
//! Used to invert monotone pricing functions, e.g. recovering the
//! Black-Scholes volatility implied by a Heston price.
//!
//! ## Available Solvers
//!
//! - [`BrentSolver`]: Inverse quadratic interpolation safeguarded by bisection
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries:
//! - `tolerance`: Bracket width / residual tolerance (default: 1e-10)
//! - `max_iterations`: Iteration cap (default: 100)
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
