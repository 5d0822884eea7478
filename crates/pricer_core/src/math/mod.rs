//! Numerical building blocks.
//!
//! - [`quadrature`]: Adaptive Gauss-Kronrod integration
//! - [`solvers`]: Bracketing root finders

pub mod quadrature;
pub mod solvers;
