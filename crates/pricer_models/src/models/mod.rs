//! Stochastic model parameterisations.
//!
//! - [`heston`]: Heston++ stochastic volatility parameters

pub mod heston;

pub use heston::HestonParams;
