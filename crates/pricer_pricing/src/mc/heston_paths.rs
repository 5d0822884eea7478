//! Heston(++) path generation.
//!
//! All paths advance in lockstep, one time step at a time:
//!
//! ```text
//! v(t)  = v + κ(θ - v)dt + σ√v·√dt·Zv            (+ σ²dt(Zv² - 1)/4, Milstein)
//! v(t)  = policy(v(t))                           (truncation or reflection)
//! ρ*(t) = ρ·√(v(t) / (v(t) + φ))                 (ρ when φ = 0)
//! Zs'   = ρ*(t-1)·Zv + √(1 - ρ*(t-1)²)·Zs
//! S(t)  = S·exp((m - q - v/2)dt + √(v + φ)·√dt·Zs')
//! ```
//!
//! where `v`, `S` are the previous step's values and `m` is `r` under the
//! risk-neutral measure or `mu` under the real-world one. The price
//! innovation uses the previous step's adjusted correlation.
//!
//! # Memory Layout
//!
//! Tables are stored in row-major order: `table[path_idx * (n_steps + 1) + step_idx]`
//! where `step_idx = 0` holds the initial state.

use pricer_models::models::HestonParams;

use super::config::{HestonSimulationConfig, Measure, Scheme};
use crate::rng::{NormalSource, PricerRng, ThreadRngSource};

/// Simulated spot, volatility and adjusted-correlation tables.
///
/// All three tables have shape `(n_paths, n_steps + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPathSet {
    n_paths: usize,
    n_steps: usize,
    spots: Vec<f64>,
    vols: Vec<f64>,
    rho_adj: Vec<f64>,
}

impl SimulatedPathSet {
    fn filled(n_paths: usize, n_steps: usize) -> Self {
        let len = n_paths * (n_steps + 1);
        Self {
            n_paths,
            n_steps,
            spots: vec![0.0; len],
            vols: vec![0.0; len],
            rho_adj: vec![0.0; len],
        }
    }

    /// `(n_paths, n_steps + 1)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_paths, self.n_steps + 1)
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    #[inline]
    fn row(&self, path_idx: usize) -> std::ops::Range<usize> {
        let width = self.n_steps + 1;
        path_idx * width..(path_idx + 1) * width
    }

    /// Spot path `path_idx`.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= n_paths`.
    #[inline]
    pub fn spot_path(&self, path_idx: usize) -> &[f64] {
        &self.spots[self.row(path_idx)]
    }

    /// Volatility (square root of variance) path `path_idx`.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= n_paths`.
    #[inline]
    pub fn vol_path(&self, path_idx: usize) -> &[f64] {
        &self.vols[self.row(path_idx)]
    }

    /// Adjusted-correlation path `path_idx`.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= n_paths`.
    #[inline]
    pub fn rho_adj_path(&self, path_idx: usize) -> &[f64] {
        &self.rho_adj[self.row(path_idx)]
    }

    /// Full spot table, row-major.
    #[inline]
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    /// Full volatility table, row-major.
    #[inline]
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }

    /// Full adjusted-correlation table, row-major.
    #[inline]
    pub fn rho_adj(&self) -> &[f64] {
        &self.rho_adj
    }

    /// Spot of every path at the horizon.
    pub fn terminal_spots(&self) -> Vec<f64> {
        self.column(&self.spots, self.n_steps)
    }

    /// Volatility of every path at the horizon.
    pub fn terminal_vols(&self) -> Vec<f64> {
        self.column(&self.vols, self.n_steps)
    }

    fn column(&self, table: &[f64], step_idx: usize) -> Vec<f64> {
        table
            .iter()
            .skip(step_idx)
            .step_by(self.n_steps + 1)
            .copied()
            .collect()
    }
}

/// Heston(++) path simulator.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{HestonPathSimulator, HestonSimulationConfig};
/// use pricer_pricing::rng::PricerRng;
///
/// let config = HestonSimulationConfig::builder()
///     .n_paths(100)
///     .n_steps(12)
///     .horizon(1.0)
///     .build()
///     .unwrap();
/// let simulator = HestonPathSimulator::new(HestonParams::default(), config);
///
/// let paths = simulator.simulate(&mut PricerRng::from_seed(7));
/// assert_eq!(paths.shape(), (100, 13));
/// assert_eq!(paths.spot_path(0)[0], 100.0);
/// ```
#[derive(Clone, Debug)]
pub struct HestonPathSimulator {
    params: HestonParams,
    config: HestonSimulationConfig,
}

impl HestonPathSimulator {
    /// Simulator for `params` under `config`.
    ///
    /// Logs a warning when the Feller condition is violated.
    pub fn new(params: HestonParams, config: HestonSimulationConfig) -> Self {
        params.warn_if_feller_violated();
        Self::from_parts(params, config)
    }

    /// Simulator without the Feller diagnostic, for callers that already ran it.
    pub(crate) fn from_parts(params: HestonParams, config: HestonSimulationConfig) -> Self {
        Self { params, config }
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Simulation configuration.
    #[inline]
    pub fn config(&self) -> &HestonSimulationConfig {
        &self.config
    }

    /// Simulate with draws from the process-wide generator.
    pub fn simulate_fresh(&self) -> SimulatedPathSet {
        self.simulate(&mut ThreadRngSource::new())
    }

    /// Simulate with a generator seeded from the configuration, or from the
    /// process-wide generator when no seed is set.
    pub fn simulate_default(&self) -> SimulatedPathSet {
        match self.config.seed() {
            Some(seed) => self.simulate(&mut PricerRng::from_seed(seed)),
            None => self.simulate_fresh(),
        }
    }

    /// Simulate all paths, drawing `n_paths` variance shocks then `n_paths`
    /// spot shocks at every step.
    pub fn simulate<R: NormalSource + ?Sized>(&self, normals: &mut R) -> SimulatedPathSet {
        let p = &self.params;
        let n_paths = self.config.n_paths();
        let n_steps = self.config.n_steps();
        let width = n_steps + 1;

        let dt = self.config.dt();
        let sqrt_dt = dt.sqrt();
        let (kappa, theta, sigma, rho, phi) = (p.kappa(), p.theta(), p.sigma(), p.rho(), p.phi());
        let milstein = match self.config.scheme() {
            Scheme::Milstein => 0.25 * sigma * sigma * dt,
            Scheme::Euler => 0.0,
        };
        let drift = match self.config.measure() {
            Measure::RiskNeutral => p.risk_free_rate(),
            Measure::RealWorld => p.mu(),
        } - p.dividend_yield();
        let discretisation = self.config.discretisation();

        tracing::debug!(
            n_paths,
            n_steps,
            horizon = self.config.horizon(),
            scheme = %self.config.scheme(),
            discretisation = %discretisation,
            measure = %self.config.measure(),
            "simulating Heston paths"
        );

        let mut out = SimulatedPathSet::filled(n_paths, n_steps);

        let mut spot = vec![p.s0(); n_paths];
        let mut variance = vec![p.v0(); n_paths];
        let mut rho_prev = vec![rho; n_paths];
        let mut zv = vec![0.0; n_paths];
        let mut zs = vec![0.0; n_paths];

        for path_idx in 0..n_paths {
            let base = path_idx * width;
            out.spots[base] = p.s0();
            out.vols[base] = p.v0().sqrt();
            out.rho_adj[base] = rho;
        }

        for step_idx in 1..=n_steps {
            normals.fill_normal(&mut zv);
            normals.fill_normal(&mut zs);

            for path_idx in 0..n_paths {
                let v = variance[path_idx];
                let s = spot[path_idx];
                let z_v = zv[path_idx];

                let raw = v
                    + kappa * (theta - v) * dt
                    + sigma * v.sqrt() * sqrt_dt * z_v
                    + milstein * (z_v * z_v - 1.0);
                let v_next = discretisation.apply(raw);

                let rho_next = if phi == 0.0 {
                    rho
                } else {
                    rho * (v_next / (v_next + phi)).sqrt()
                };

                let lagged = rho_prev[path_idx];
                let z_s = lagged * z_v + (1.0 - lagged * lagged).sqrt() * zs[path_idx];
                let s_next =
                    s * ((drift - 0.5 * v) * dt + (v + phi).sqrt() * sqrt_dt * z_s).exp();

                variance[path_idx] = v_next;
                spot[path_idx] = s_next;
                rho_prev[path_idx] = rho_next;

                let at = path_idx * width + step_idx;
                out.spots[at] = s_next;
                out.vols[at] = v_next.sqrt();
                out.rho_adj[at] = rho_next;
            }
        }

        out
    }
}
