//! Option requests and pricing interfaces.
//!
//! This module provides:
//! - [`OptionSpec`] / [`OptionFlag`]: validated European option requests
//! - [`PricingBatch`]: options resolved against model defaults
//! - [`OptionPricer`] / [`OptionGreeks`]: batch pricing traits

pub mod batch;
pub mod traits;
pub mod vanilla;

pub use batch::{BatchLayout, PricingBatch, ResolvedOption};
pub use traits::{OptionGreeks, OptionPricer};
pub use vanilla::{OptionFlag, OptionSpec};
