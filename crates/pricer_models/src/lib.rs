//! # Pricer Models (L2: Business Logic)
//!
//! Heston(++) model parameters, European option requests and analytic
//! pricers.
//!
//! This crate provides:
//! - [`models::HestonParams`]: validated stochastic-volatility parameters
//! - [`instruments`]: option specifications, batches and pricing traits
//! - [`analytical`]: the Fourier-inversion Heston pricer and the
//!   Black-Scholes reference
//!
//! ## Example
//!
//! ```
//! use pricer_models::analytical::HestonAnalyticPricer;
//! use pricer_models::instruments::{OptionPricer, OptionSpec};
//! use pricer_models::models::HestonParams;
//!
//! let params = HestonParams::default().with_risk_free_rate(0.05).unwrap();
//! let pricer = HestonAnalyticPricer::new(params);
//! let call = pricer.npv_one(&OptionSpec::call(100.0, 1.0).unwrap()).unwrap();
//! assert!((call - 10.394).abs() < 1e-2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
