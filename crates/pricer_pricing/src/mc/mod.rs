//! Monte Carlo simulation of the Heston(++) model.
//!
//! # Architecture
//!
//! ```text
//! HestonMonteCarloPricer
//! ├── HestonSimulationConfig  (paths, steps, policies, seed)
//! ├── HestonPathSimulator     (lockstep recurrence over all paths)
//! │   └── NormalSource        (PricerRng or the process-wide generator)
//! └── stats                   (mean, standard error)
//! ```
//!
//! # Example
//!
//! ```rust
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{HestonPathSimulator, HestonSimulationConfig};
//! use pricer_pricing::rng::PricerRng;
//!
//! let config = HestonSimulationConfig::builder()
//!     .n_paths(1000)
//!     .n_steps(252)
//!     .horizon(1.0)
//!     .scheme("euler".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let simulator = HestonPathSimulator::new(HestonParams::default(), config);
//! let paths = simulator.simulate(&mut PricerRng::from_seed(42));
//! assert_eq!(paths.shape(), (1000, 253));
//! ```

mod config;
mod error;
mod heston_paths;
mod pricer;
mod stats;

pub use config::{
    Discretisation, HestonSimulationConfig, HestonSimulationConfigBuilder, Measure, Scheme,
    MAX_PATHS, MAX_STEPS, VARIANCE_FLOOR,
};
pub use error::ConfigError;
pub use heston_paths::{HestonPathSimulator, SimulatedPathSet};
pub use pricer::{HestonMonteCarloPricer, PricingResult};
pub use stats::{mean, standard_error};
