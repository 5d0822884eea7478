//! # pricer_core: Numerical Foundation for Heston Option Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Error types: `PricingError`, `SolverError` (`types::error`)
//! - Adaptive vector quadrature: `GaussKronrod` (`math::quadrature`)
//! - Bracketing root finder: `BrentSolver` (`math::solvers`)
//!
//! ## Minimal Dependencies
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: Generic floating-point solvers
//! - thiserror: Error derivation
//! - serde: Configuration serialisation (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::quadrature::GaussKronrod;
//! use pricer_core::math::solvers::BrentSolver;
//!
//! // ∫_0^1 e^x dx
//! let (value, _err) = GaussKronrod::with_defaults()
//!     .integrate_scalar(|x| x.exp(), 0.0, 1.0)
//!     .unwrap();
//! assert!((value - (1.0_f64.exp() - 1.0)).abs() < 1e-12);
//!
//! // Solve e^x = 2
//! let root = BrentSolver::with_defaults()
//!     .find_root(|x: f64| x.exp() - 2.0, 0.0, 1.0)
//!     .unwrap();
//! assert!((root - 2.0_f64.ln()).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for configuration types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
