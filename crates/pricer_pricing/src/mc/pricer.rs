//! Monte Carlo pricing of European options under Heston(++).
//!
//! Options are grouped by the inputs a simulation depends on (maturity,
//! spot, initial variance). Each group is simulated once under the
//! risk-neutral measure over its own maturity, and all strikes of the group
//! are read off the same terminal spots. Groups run in parallel on `rayon`,
//! each with its own generator stream derived from the configured seed, so
//! results do not depend on thread scheduling.

use pricer_core::types::PricingError;
use pricer_models::instruments::{OptionPricer, OptionSpec, PricingBatch, ResolvedOption};
use pricer_models::models::HestonParams;
use rayon::prelude::*;

use super::config::{HestonSimulationConfig, Measure};
use super::heston_paths::{HestonPathSimulator, SimulatedPathSet};
use super::stats::{mean, standard_error};
use crate::rng::{PricerRng, ThreadRngSource};

/// Monte Carlo price estimate.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::PricingResult;
///
/// let result = PricingResult { price: 10.5, std_error: 0.05 };
/// assert!((result.confidence_95() - 0.098).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PricingResult {
    /// Present value of the instrument.
    pub price: f64,
    /// Standard error of the price estimate.
    pub std_error: f64,
}

impl PricingResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Options sharing one simulation.
struct SimulationGroup {
    tau: f64,
    spot: f64,
    v0: f64,
    members: Vec<usize>,
}

impl SimulationGroup {
    fn accepts(&self, option: &ResolvedOption) -> bool {
        self.tau == option.tau && self.spot == option.spot && self.v0 == option.v0
    }
}

/// Monte Carlo pricer for European options.
///
/// The simulation template fixes path and step counts and the variance
/// policies; its horizon is replaced by each maturity and its measure is
/// always risk neutral.
///
/// # Examples
///
/// ```rust
/// use pricer_models::instruments::OptionSpec;
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{HestonMonteCarloPricer, HestonSimulationConfig};
///
/// let template = HestonSimulationConfig::builder()
///     .n_paths(20_000)
///     .n_steps(50)
///     .horizon(1.0)
///     .seed(42)
///     .build()
///     .unwrap();
/// let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template);
///
/// let results = pricer
///     .price_with_error(&[OptionSpec::call(100.0, 1.0).unwrap()])
///     .unwrap();
/// assert!((results[0].price - 7.6157).abs() < 5.0 * results[0].std_error + 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct HestonMonteCarloPricer {
    params: HestonParams,
    template: HestonSimulationConfig,
}

impl HestonMonteCarloPricer {
    /// Pricer for `params` using `template` for every simulation.
    ///
    /// Logs a warning when the Feller condition is violated.
    pub fn new(params: HestonParams, template: HestonSimulationConfig) -> Self {
        params.warn_if_feller_violated();
        Self {
            params,
            template: template.with_measure(Measure::RiskNeutral),
        }
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Simulation template.
    #[inline]
    pub fn template(&self) -> &HestonSimulationConfig {
        &self.template
    }

    /// Price and standard error of every option, in input order.
    ///
    /// Expired options are priced at intrinsic value with zero error.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if a group's parameters cannot be
    /// formed (for example a spot override rejected by the model).
    pub fn price_with_error(
        &self,
        options: &[OptionSpec],
    ) -> Result<Vec<PricingResult>, PricingError> {
        let batch = PricingBatch::new(options, self.params.s0(), self.params.v0());
        let mut results: Vec<PricingResult> = batch
            .intrinsic_values()
            .into_iter()
            .map(|price| PricingResult {
                price,
                std_error: 0.0,
            })
            .collect();

        let groups = Self::group(&batch);
        let priced: Vec<Vec<(usize, PricingResult)>> = groups
            .par_iter()
            .enumerate()
            .map(|(index, group)| self.price_group(&batch, group, index as u64))
            .collect::<Result<_, PricingError>>()?;

        for (k, result) in priced.into_iter().flatten() {
            results[k] = result;
        }
        Ok(results)
    }

    /// Live options grouped by simulation inputs, in order of first appearance.
    fn group(batch: &PricingBatch) -> Vec<SimulationGroup> {
        let mut groups: Vec<SimulationGroup> = Vec::new();
        for &k in batch.live_indices() {
            let option = &batch.options()[k];
            match groups.iter_mut().find(|g| g.accepts(option)) {
                Some(group) => group.members.push(k),
                None => groups.push(SimulationGroup {
                    tau: option.tau,
                    spot: option.spot,
                    v0: option.v0,
                    members: vec![k],
                }),
            }
        }
        groups
    }

    fn simulate(&self, group: &SimulationGroup, index: u64) -> Result<SimulatedPathSet, PricingError> {
        let params = self.params.with_s0(group.spot)?.with_v0(group.v0)?;
        let config = self.template.with_horizon(group.tau)?;
        let simulator = HestonPathSimulator::from_parts(params, config);

        Ok(match self.template.seed() {
            Some(seed) => simulator.simulate(&mut PricerRng::stream(seed, index)),
            None => simulator.simulate(&mut ThreadRngSource::new()),
        })
    }

    fn price_group(
        &self,
        batch: &PricingBatch,
        group: &SimulationGroup,
        index: u64,
    ) -> Result<Vec<(usize, PricingResult)>, PricingError> {
        let paths = self.simulate(group, index)?;
        let terminal = paths.terminal_spots();
        let discount = (-self.params.risk_free_rate() * group.tau).exp();

        tracing::debug!(
            group = index,
            tau = group.tau,
            options = group.members.len(),
            n_paths = paths.n_paths(),
            "priced simulation group"
        );

        let mut payoffs = vec![0.0; terminal.len()];
        Ok(group
            .members
            .iter()
            .map(|&k| {
                let option = &batch.options()[k];
                for (payoff, &s) in payoffs.iter_mut().zip(&terminal) {
                    *payoff = option.flag.intrinsic(s, option.strike);
                }
                let result = PricingResult {
                    price: discount * mean(&payoffs),
                    std_error: discount * standard_error(&payoffs),
                };
                (k, result)
            })
            .collect())
    }
}

impl OptionPricer for HestonMonteCarloPricer {
    fn npv(&self, options: &[OptionSpec]) -> Result<Vec<f64>, PricingError> {
        Ok(self
            .price_with_error(options)?
            .into_iter()
            .map(|r| r.price)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(n_paths: usize, seed: u64) -> HestonSimulationConfig {
        HestonSimulationConfig::builder()
            .n_paths(n_paths)
            .n_steps(20)
            .horizon(1.0)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_batch() {
        let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template(100, 1));
        assert!(pricer.price_with_error(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_expired_is_intrinsic_with_zero_error() {
        let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template(100, 1));
        let results = pricer
            .price_with_error(&[OptionSpec::put(120.0, 0.0).unwrap()])
            .unwrap();
        assert_eq!(
            results[0],
            PricingResult {
                price: 20.0,
                std_error: 0.0
            }
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template(2_000, 7));
        let options = [
            OptionSpec::call(100.0, 1.0).unwrap(),
            OptionSpec::put(90.0, 0.5).unwrap(),
            OptionSpec::call(110.0, 2.0).unwrap(),
        ];
        assert_eq!(
            pricer.price_with_error(&options).unwrap(),
            pricer.price_with_error(&options).unwrap()
        );
    }

    #[test]
    fn test_grouping_by_simulation_inputs() {
        let options = [
            OptionSpec::call(90.0, 1.0).unwrap(),
            OptionSpec::call(100.0, 0.5).unwrap(),
            OptionSpec::put(110.0, 1.0).unwrap(),
            OptionSpec::call(100.0, 1.0).unwrap().with_v0(0.09).unwrap(),
            OptionSpec::call(100.0, 0.0).unwrap(),
        ];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        let groups = HestonMonteCarloPricer::group(&batch);
        let members: Vec<Vec<usize>> = groups.iter().map(|g| g.members.clone()).collect();
        assert_eq!(members, vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn test_measure_forced_risk_neutral() {
        let rw = HestonSimulationConfig::builder()
            .n_paths(10)
            .n_steps(5)
            .horizon(1.0)
            .measure(Measure::RealWorld)
            .build()
            .unwrap();
        let pricer = HestonMonteCarloPricer::new(HestonParams::default(), rw);
        assert_eq!(pricer.template().measure(), Measure::RiskNeutral);
    }

    #[test]
    fn test_same_group_shares_terminal_spots() {
        // Call minus put on one simulation equals the discounted mean of
        // S(T) - K exactly, path by path.
        let pricer = HestonMonteCarloPricer::new(HestonParams::default(), template(500, 3));
        let options = [
            OptionSpec::call(100.0, 1.0).unwrap(),
            OptionSpec::put(100.0, 1.0).unwrap(),
            OptionSpec::call(80.0, 1.0).unwrap(),
            OptionSpec::put(80.0, 1.0).unwrap(),
        ];
        let prices = pricer.npv(&options).unwrap();
        let forward_gap = (prices[0] - prices[1]) - (prices[2] - prices[3]);
        assert!((forward_gap - (80.0 - 100.0)).abs() < 1e-9);
    }
}
