//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for pricing and solver operations
//!
//! # Re-exports
//!
//! [`PricingError`], [`SolverError`] and [`ensure_finite`] are re-exported at
//! this module level.

pub mod error;

pub use error::{ensure_finite, PricingError, SolverError};
