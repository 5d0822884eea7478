//! Ordered option batches with resolved pricing inputs.
//!
//! A batch pairs each [`OptionSpec`] with the spot and initial variance it
//! will actually be priced against, and classifies the options that still
//! need integration:
//!
//! - [`BatchLayout::Uniform`]: every live option shares `tau`, spot and `v0`,
//!   so a transform pricer can evaluate the characteristic function once per
//!   node and reuse it across strikes
//! - [`BatchLayout::PerOption`]: one evaluation per option per node
//!
//! Options with `tau == 0` are expired and priced at intrinsic value.

use super::vanilla::{OptionFlag, OptionSpec};

/// Pricing inputs of one option after applying overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOption {
    /// Strike price.
    pub strike: f64,
    /// Time to expiry.
    pub tau: f64,
    /// Spot used for this option.
    pub spot: f64,
    /// Initial variance used for this option.
    pub v0: f64,
    /// Call/put flag.
    pub flag: OptionFlag,
}

impl ResolvedOption {
    /// Whether the option has no time left.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.tau == 0.0
    }

    /// Payoff at the resolved spot.
    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.flag.intrinsic(self.spot, self.strike)
    }
}

/// Shape of the live part of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchLayout {
    /// All live options share these inputs.
    Uniform {
        /// Shared time to expiry.
        tau: f64,
        /// Shared spot.
        spot: f64,
        /// Shared initial variance.
        v0: f64,
    },
    /// Inputs differ across live options.
    PerOption,
}

/// An ordered set of options sharing one model.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{BatchLayout, OptionSpec, PricingBatch};
///
/// let options = [
///     OptionSpec::call(90.0, 1.0).unwrap(),
///     OptionSpec::put(110.0, 1.0).unwrap(),
///     OptionSpec::call(100.0, 0.0).unwrap(),
/// ];
/// let batch = PricingBatch::new(&options, 100.0, 0.04);
///
/// assert_eq!(batch.len(), 3);
/// assert_eq!(batch.live_indices(), &[0, 1]);
/// assert_eq!(
///     batch.layout(),
///     BatchLayout::Uniform { tau: 1.0, spot: 100.0, v0: 0.04 }
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PricingBatch {
    options: Vec<ResolvedOption>,
    live: Vec<usize>,
    layout: BatchLayout,
}

impl PricingBatch {
    /// Resolve `options` against the model's default spot and `v0`.
    ///
    /// Overrides apply option by option.
    pub fn new(options: &[OptionSpec], default_spot: f64, default_v0: f64) -> Self {
        let options: Vec<ResolvedOption> = options
            .iter()
            .map(|o| ResolvedOption {
                strike: o.strike(),
                tau: o.tau(),
                spot: o.effective_spot(default_spot),
                v0: o.v0().unwrap_or(default_v0),
                flag: o.flag(),
            })
            .collect();

        let live: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_expired())
            .map(|(i, _)| i)
            .collect();

        let layout = Self::classify(live.iter().map(|&i| &options[i]));

        Self {
            options,
            live,
            layout,
        }
    }

    fn classify<'a>(mut live: impl Iterator<Item = &'a ResolvedOption>) -> BatchLayout {
        let Some(first) = live.next() else {
            return BatchLayout::PerOption;
        };
        let shared = live.all(|o| o.tau == first.tau && o.spot == first.spot && o.v0 == first.v0);
        if shared {
            BatchLayout::Uniform {
                tau: first.tau,
                spot: first.spot,
                v0: first.v0,
            }
        } else {
            BatchLayout::PerOption
        }
    }

    /// Number of options.
    #[inline]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the batch is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Resolved options in input order.
    #[inline]
    pub fn options(&self) -> &[ResolvedOption] {
        &self.options
    }

    /// Input positions of options with `tau > 0`.
    #[inline]
    pub fn live_indices(&self) -> &[usize] {
        &self.live
    }

    /// Classification of the live options.
    #[inline]
    pub fn layout(&self) -> BatchLayout {
        self.layout
    }

    /// Output vector pre-filled with intrinsic values.
    ///
    /// Live entries are overwritten by the pricer.
    pub fn intrinsic_values(&self) -> Vec<f64> {
        self.options.iter().map(ResolvedOption::intrinsic).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        let batch = PricingBatch::new(&[], 100.0, 0.04);
        assert!(batch.is_empty());
        assert_eq!(batch.layout(), BatchLayout::PerOption);
        assert!(batch.intrinsic_values().is_empty());
    }

    #[test]
    fn test_overrides_apply_per_option() {
        let options = [
            OptionSpec::call(100.0, 1.0).unwrap().with_v0(0.09).unwrap(),
            OptionSpec::call(100.0, 1.0).unwrap(),
        ];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        assert_eq!(batch.options()[0].v0, 0.09);
        assert_eq!(batch.options()[1].v0, 0.04);
        assert_eq!(batch.layout(), BatchLayout::PerOption);
    }

    #[test]
    fn test_uniform_when_overrides_agree_with_defaults() {
        let options = [
            OptionSpec::call(90.0, 1.0).unwrap().with_spot(100.0).unwrap(),
            OptionSpec::put(110.0, 1.0).unwrap(),
        ];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        assert!(matches!(batch.layout(), BatchLayout::Uniform { .. }));
    }

    #[test]
    fn test_mixed_maturities_are_per_option() {
        let options = [
            OptionSpec::call(100.0, 0.5).unwrap(),
            OptionSpec::call(100.0, 1.0).unwrap(),
        ];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        assert_eq!(batch.layout(), BatchLayout::PerOption);
    }

    #[test]
    fn test_expired_options_excluded_from_layout() {
        let options = [
            OptionSpec::put(120.0, 0.0).unwrap(),
            OptionSpec::call(100.0, 1.0).unwrap(),
        ];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        assert_eq!(batch.live_indices(), &[1]);
        assert_eq!(
            batch.layout(),
            BatchLayout::Uniform {
                tau: 1.0,
                spot: 100.0,
                v0: 0.04
            }
        );
        assert_eq!(batch.intrinsic_values(), vec![20.0, 0.0]);
    }

    #[test]
    fn test_all_expired() {
        let options = [OptionSpec::call(90.0, 0.0).unwrap()];
        let batch = PricingBatch::new(&options, 100.0, 0.04);
        assert!(batch.live_indices().is_empty());
        assert_eq!(batch.layout(), BatchLayout::PerOption);
        assert_eq!(batch.intrinsic_values(), vec![10.0]);
    }
}
