//! Analytical pricing of European options.
//!
//! This module provides:
//! - [`HestonAnalyticPricer`]: Heston(++) prices by Fourier inversion of the
//!   characteristic function
//! - [`BlackScholes`]: closed-form lognormal reference with implied volatility
//! - [`distributions`]: standard normal CDF and PDF
//!
//! Both pricers implement [`OptionPricer`](crate::instruments::OptionPricer)
//! and [`OptionGreeks`](crate::instruments::OptionGreeks).

pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod heston;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use heston::{
    GreekBumps, HestonAnalyticPricer, HestonCharacteristicFunction, ProbabilityBranch, Z_MAX,
};
