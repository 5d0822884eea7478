//! # Random Number Generation
//!
//! Standard normal variates for the path simulator.
//!
//! ## Module Structure
//!
//! - [`prng`]: [`PricerRng`], a seeded generator for reproducible runs
//! - [`source`]: the [`NormalSource`] trait the simulator draws from, and
//!   [`ThreadRngSource`] backed by the process-wide generator
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{NormalSource, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(12345);
//!
//! // Batch generation into a pre-allocated buffer
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;
mod source;

pub use prng::PricerRng;
pub use source::{NormalSource, ThreadRngSource};
