//! # Pricer Engine (Layer 3: Simulation)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing simulates the Heston(++) model on top of the model and
//! instrument definitions of `pricer_models`:
//! - Seeded and process-wide normal generators
//! - Vectorised path simulation with truncation or reflection of the variance
//! - Monte Carlo prices with standard errors, parallel across maturities
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::instruments::{OptionPricer, OptionSpec};
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{HestonMonteCarloPricer, HestonSimulationConfig};
//!
//! let template = HestonSimulationConfig::builder()
//!     .n_paths(5_000)
//!     .n_steps(50)
//!     .horizon(1.0)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template);
//! let prices = pricer.npv(&[OptionSpec::call(100.0, 1.0).unwrap()]).unwrap();
//! assert!(prices[0] > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;
