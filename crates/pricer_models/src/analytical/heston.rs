//! Semi-analytic Heston(++) pricing by Fourier inversion.
//!
//! The exercise probabilities of a European option are recovered from the
//! characteristic function of the log spot:
//!
//! Q_j = 1/2 + (1/π) ∫₀^Z_MAX Re[ e^(-iz·ln K) · f_j(z) / (iz) ] dz
//!
//! with `j = 1` under the stock measure and `j = 2` under the money-market
//! measure. Prices follow from
//!
//! **Call**: C = S·e^(-qT)·Q₁ - K·e^(-rT)·Q₂
//! **Put**: P = C - S·e^(-qT) + K·e^(-rT)
//!
//! The integrand is vector valued: all options of a batch are integrated
//! together on one adaptive mesh.

use std::f64::consts::PI;

use num_complex::Complex64;
use pricer_core::math::quadrature::{GaussKronrod, QuadratureConfig};
use pricer_core::types::PricingError;

use crate::instruments::{
    BatchLayout, OptionFlag, OptionGreeks, OptionPricer, OptionSpec, PricingBatch,
};
use crate::models::HestonParams;

/// Upper limit of the Fourier integral.
pub const Z_MAX: f64 = 1000.0;

/// Measure under which an exercise probability is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbabilityBranch {
    /// Stock as numeraire (`j = 1`).
    StockMeasure,
    /// Money-market account as numeraire (`j = 2`).
    MoneyMarket,
}

impl ProbabilityBranch {
    /// Both branches in `j` order.
    pub const ALL: [ProbabilityBranch; 2] =
        [ProbabilityBranch::StockMeasure, ProbabilityBranch::MoneyMarket];

    /// Conventional index `j`.
    #[inline]
    pub fn index(self) -> i32 {
        match self {
            ProbabilityBranch::StockMeasure => 1,
            ProbabilityBranch::MoneyMarket => 2,
        }
    }
}

impl TryFrom<i32> for ProbabilityBranch {
    type Error = PricingError;

    fn try_from(j: i32) -> Result<Self, Self::Error> {
        match j {
            1 => Ok(ProbabilityBranch::StockMeasure),
            2 => Ok(ProbabilityBranch::MoneyMarket),
            other => Err(PricingError::invalid(
                "j",
                format!("must be 1 or 2, got {}", other),
            )),
        }
    }
}

/// Characteristic function of ln S(τ) under the Heston(++) dynamics.
///
/// The `phi` shift adds a deterministic variance to the diffusion, entering
/// the exponent through `0.5·z·(w·i - z)·phi·τ`.
///
/// # Examples
/// ```
/// use num_complex::Complex64;
/// use pricer_models::analytical::{HestonCharacteristicFunction, ProbabilityBranch};
/// use pricer_models::models::HestonParams;
///
/// let cf = HestonCharacteristicFunction::new(HestonParams::default());
/// let at_zero = cf.evaluate(1.0, 100.0, 0.04, Complex64::new(0.0, 0.0), ProbabilityBranch::MoneyMarket);
/// assert!((at_zero - Complex64::new(1.0, 0.0)).norm() < 1e-14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HestonCharacteristicFunction {
    params: HestonParams,
}

impl HestonCharacteristicFunction {
    /// Wrap a parameter set.
    pub fn new(params: HestonParams) -> Self {
        Self { params }
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Evaluate `f_j(z)` for maturity `tau`, spot `s0` and initial variance `v0`.
    ///
    /// Principal square root and logarithm throughout. `sigma == 0` divides
    /// by zero and yields non-finite output.
    pub fn evaluate(
        &self,
        tau: f64,
        s0: f64,
        v0: f64,
        z: Complex64,
        branch: ProbabilityBranch,
    ) -> Complex64 {
        let p = &self.params;
        let i = Complex64::i();
        let one = Complex64::new(1.0, 0.0);

        let (w, b) = match branch {
            ProbabilityBranch::StockMeasure => (1.0, p.kappa() - p.rho() * p.sigma()),
            ProbabilityBranch::MoneyMarket => (-1.0, p.kappa()),
        };

        let ixi = i * z;
        let rho_sigma = p.rho() * p.sigma();
        let sigma_sq = p.sigma() * p.sigma();

        let c = rho_sigma * ixi - b;
        let d = (c * c - sigma_sq * (w * ixi - z * z)).sqrt();

        let b_minus = b - rho_sigma * ixi - d;
        let b_plus = b - rho_sigma * ixi + d;
        let g = b_minus / b_plus;
        let ee = (-d * tau).exp();

        let shift = 0.5 * z * (w * i - z) * (p.phi() * tau);
        let drift = (p.risk_free_rate() - p.dividend_yield()) * ixi * tau;
        let mean_reversion = (p.kappa() * p.theta() / sigma_sq)
            * (b_minus * tau - 2.0 * ((one - g * ee) / (one - g)).ln());
        let big_c = shift + drift + mean_reversion;
        let big_d = (b_minus / sigma_sq) * (one - ee) / (one - g * ee);

        (big_c + big_d * v0 + ixi * s0.ln()).exp()
    }
}

/// Relative and absolute bump sizes for finite-difference greeks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreekBumps {
    /// Spot bump as a fraction of spot.
    pub spot_relative: f64,
    /// Absolute bump of `sqrt(v0)`.
    pub vol_absolute: f64,
}

impl Default for GreekBumps {
    fn default() -> Self {
        Self {
            spot_relative: 5e-3,
            vol_absolute: 1e-3,
        }
    }
}

/// Heston(++) European option pricer by Fourier inversion.
///
/// Options override the model spot and initial variance individually.
/// Expired options (`tau == 0`) are priced at intrinsic value without
/// integration.
///
/// # Examples
/// ```
/// use pricer_models::analytical::HestonAnalyticPricer;
/// use pricer_models::instruments::{OptionPricer, OptionSpec};
/// use pricer_models::models::HestonParams;
///
/// let pricer = HestonAnalyticPricer::new(HestonParams::default());
/// let options = [OptionSpec::call(100.0, 1.0).unwrap(), OptionSpec::put(100.0, 1.0).unwrap()];
/// let prices = pricer.npv(&options).unwrap();
///
/// assert!((prices[0] - 7.615746917866517).abs() < 1e-6);
/// // r = q = 0: call and put coincide at the money.
/// assert!((prices[0] - prices[1]).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct HestonAnalyticPricer {
    cf: HestonCharacteristicFunction,
    integrator: GaussKronrod,
    bumps: GreekBumps,
}

impl HestonAnalyticPricer {
    /// Pricer with the default quadrature tolerances.
    ///
    /// Logs a warning when the Feller condition is violated.
    pub fn new(params: HestonParams) -> Self {
        params.warn_if_feller_violated();
        Self {
            cf: HestonCharacteristicFunction::new(params),
            integrator: GaussKronrod::with_defaults(),
            bumps: GreekBumps::default(),
        }
    }

    /// Replace the quadrature settings.
    pub fn with_quadrature(self, config: QuadratureConfig) -> Result<Self, PricingError> {
        Ok(Self {
            integrator: GaussKronrod::new(config)?,
            ..self
        })
    }

    /// Replace the greek bump sizes.
    pub fn with_bumps(self, bumps: GreekBumps) -> Result<Self, PricingError> {
        if !(bumps.spot_relative.is_finite() && bumps.spot_relative > 0.0) {
            return Err(PricingError::invalid(
                "spot_relative",
                format!("must be positive, got {}", bumps.spot_relative),
            ));
        }
        if !(bumps.vol_absolute.is_finite() && bumps.vol_absolute > 0.0) {
            return Err(PricingError::invalid(
                "vol_absolute",
                format!("must be positive, got {}", bumps.vol_absolute),
            ));
        }
        Ok(Self { bumps, ..self })
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        self.cf.params()
    }

    /// Characteristic function in use.
    #[inline]
    pub fn characteristic_function(&self) -> &HestonCharacteristicFunction {
        &self.cf
    }

    /// `Q_j` for every live option of the batch, in `live_indices` order.
    fn exercise_probabilities(
        &self,
        batch: &PricingBatch,
        branch: ProbabilityBranch,
    ) -> Result<Vec<f64>, PricingError> {
        let live = batch.live_indices();
        let options = batch.options();
        let log_strikes: Vec<f64> = live.iter().map(|&k| options[k].strike.ln()).collect();
        let i = Complex64::i();

        let result = match batch.layout() {
            BatchLayout::Uniform { tau, spot, v0 } => self.integrator.integrate(
                |z, out: &mut [f64]| {
                    let zc = Complex64::new(z, 0.0);
                    let kernel = self.cf.evaluate(tau, spot, v0, zc, branch) / (i * zc);
                    for (o, &log_k) in out.iter_mut().zip(&log_strikes) {
                        *o = ((-i * zc * log_k).exp() * kernel).re;
                    }
                },
                0.0,
                Z_MAX,
                live.len(),
            )?,
            BatchLayout::PerOption => self.integrator.integrate(
                |z, out: &mut [f64]| {
                    let zc = Complex64::new(z, 0.0);
                    for ((o, &k), &log_k) in out.iter_mut().zip(live).zip(&log_strikes) {
                        let opt = &options[k];
                        let kernel =
                            self.cf.evaluate(opt.tau, opt.spot, opt.v0, zc, branch) / (i * zc);
                        *o = ((-i * zc * log_k).exp() * kernel).re;
                    }
                },
                0.0,
                Z_MAX,
                live.len(),
            )?,
        };

        tracing::debug!(
            j = branch.index(),
            options = live.len(),
            error = result.error_estimate,
            subdivisions = result.subdivisions,
            converged = result.converged,
            "Fourier integral"
        );

        Ok(result.values.into_iter().map(|v| 0.5 + v / PI).collect())
    }

    fn prices(&self, batch: &PricingBatch) -> Result<Vec<f64>, PricingError> {
        let mut values = batch.intrinsic_values();
        if batch.live_indices().is_empty() {
            return Ok(values);
        }

        let q1 = self.exercise_probabilities(batch, ProbabilityBranch::StockMeasure)?;
        let q2 = self.exercise_probabilities(batch, ProbabilityBranch::MoneyMarket)?;

        let r = self.params().risk_free_rate();
        let q = self.params().dividend_yield();
        for (n, &k) in batch.live_indices().iter().enumerate() {
            let opt = &batch.options()[k];
            let forward_spot = opt.spot * (-q * opt.tau).exp();
            let discounted_strike = opt.strike * (-r * opt.tau).exp();
            let call = forward_spot * q1[n] - discounted_strike * q2[n];
            values[k] = match opt.flag {
                OptionFlag::Call => call,
                OptionFlag::Put => call - forward_spot + discounted_strike,
            };
        }
        Ok(values)
    }

    fn bumped(
        options: &[OptionSpec],
        bump: impl Fn(&OptionSpec) -> Result<OptionSpec, PricingError>,
    ) -> Result<Vec<OptionSpec>, PricingError> {
        options.iter().map(bump).collect()
    }
}

impl OptionPricer for HestonAnalyticPricer {
    fn npv(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        let batch = PricingBatch::new(options, self.params().s0(), self.params().v0());
        self.prices(&batch)
    }
}

impl OptionGreeks for HestonAnalyticPricer {
    fn delta(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        let s0 = self.params().s0();
        let h = self.bumps.spot_relative;
        let up = Self::bumped(options, |o| o.with_spot(o.effective_spot(s0) * (1.0 + h)))?;
        let down = Self::bumped(options, |o| o.with_spot(o.effective_spot(s0) * (1.0 - h)))?;
        let (up, down) = (self.npv(&up)?, self.npv(&down)?);

        Ok(options
            .iter()
            .zip(up.iter().zip(&down))
            .map(|(o, (u, d))| (u - d) / (2.0 * h * o.effective_spot(s0)))
            .collect())
    }

    fn gamma(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        let s0 = self.params().s0();
        let h = self.bumps.spot_relative;
        let up = Self::bumped(options, |o| o.with_spot(o.effective_spot(s0) * (1.0 + h)))?;
        let down = Self::bumped(options, |o| o.with_spot(o.effective_spot(s0) * (1.0 - h)))?;
        let (up, mid, down) = (self.npv(&up)?, self.npv(options)?, self.npv(&down)?);

        Ok(options
            .iter()
            .enumerate()
            .map(|(n, o)| {
                let ds = h * o.effective_spot(s0);
                (up[n] - 2.0 * mid[n] + down[n]) / (ds * ds)
            })
            .collect())
    }

    /// Sensitivity to `sqrt(v0)`, by central differences floored at zero volatility.
    fn vega(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        let v0 = self.params().v0();
        let h = self.bumps.vol_absolute;
        let vol = |o: &OptionSpec| o.v0().unwrap_or(v0).sqrt();
        let vol_down = |o: &OptionSpec| (vol(o) - h).max(0.0);

        let up = Self::bumped(options, |o| o.with_v0((vol(o) + h).powi(2)))?;
        let down = Self::bumped(options, |o| o.with_v0(vol_down(o).powi(2)))?;
        let (up, down) = (self.npv(&up)?, self.npv(&down)?);

        Ok(options
            .iter()
            .enumerate()
            .map(|(n, o)| (up[n] - down[n]) / (vol(o) + h - vol_down(o)))
            .collect())
    }
}
