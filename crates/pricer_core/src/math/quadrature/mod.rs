//! Adaptive numerical integration.
//!
//! ## Available Integrators
//!
//! - [`GaussKronrod`]: Globally adaptive G10/K21 quadrature over a finite
//!   interval for vector-valued integrands
//!
//! ## Configuration
//!
//! [`QuadratureConfig`] controls:
//! - `abs_tolerance`: Absolute error target (default: 1e-200)
//! - `rel_tolerance`: Relative error target (default: 1e-8)
//! - `max_subdivisions`: Subinterval budget (default: 10 000)
//!
//! The error of a vector integral is measured in the L2 norm, so all
//! components share one subdivision of the interval.

mod config;
mod gauss_kronrod;

pub use config::QuadratureConfig;
pub use gauss_kronrod::{GaussKronrod, QuadratureResult};
