//! Reference-value and property tests for the Heston(++) analytic pricer.
//!
//! # Test Categories
//!
//! 1. **Published references**: Fang & Oosterlee (2008) Heston prices
//! 2. **Limits**: vanishing vol-of-vol against Black-Scholes
//! 3. **Properties**: parity, monotonicity, intrinsic value at expiry

use approx::assert_abs_diff_eq;
use pricer_models::analytical::{BlackScholes, HestonAnalyticPricer};
use pricer_models::instruments::{OptionGreeks, OptionPricer, OptionSpec};
use pricer_models::models::HestonParams;
use proptest::prelude::*;

/// Fang & Oosterlee (2008), section 5.2.
fn fang_oosterlee() -> HestonParams {
    HestonParams::new(1.5768, 0.0398, 0.5751, -0.5711, 0.0, 0.0175, 100.0, 0.0, 0.0, 0.0).unwrap()
}

// ============================================================================
// Published references
// ============================================================================

#[test]
fn test_fang_oosterlee_one_year() {
    let pricer = HestonAnalyticPricer::new(fang_oosterlee());
    let price = pricer.npv_one(&OptionSpec::call(100.0, 1.0).unwrap()).unwrap();
    assert_abs_diff_eq!(price, 5.785_155_450, epsilon = 1e-6);
}

#[test]
fn test_fang_oosterlee_ten_years() {
    let pricer = HestonAnalyticPricer::new(fang_oosterlee());
    let price = pricer.npv_one(&OptionSpec::call(100.0, 10.0).unwrap()).unwrap();
    assert_abs_diff_eq!(price, 22.318_945_791, epsilon = 1e-6);
}

#[test]
fn test_canonical_with_rate() {
    let params = HestonParams::default().with_risk_free_rate(0.05).unwrap();
    let pricer = HestonAnalyticPricer::new(params);
    let price = pricer.npv_one(&OptionSpec::call(100.0, 1.0).unwrap()).unwrap();
    assert!(price > 10.3 && price < 10.5, "price = {}", price);
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_implied_vol_flat_in_black_scholes_limit() {
    let params =
        HestonParams::new(2.0, 0.04, 0.01, 0.0, 0.0, 0.04, 100.0, 0.0, 0.03, 0.01).unwrap();
    let pricer = HestonAnalyticPricer::new(params);
    let options: Vec<OptionSpec> = [80.0, 90.0, 100.0, 110.0, 125.0]
        .iter()
        .map(|&k| OptionSpec::call(k, 1.0).unwrap())
        .collect();
    let quotes = pricer.npv(&options).unwrap();

    let bs = BlackScholes::new(100.0, 0.03, 0.01, 0.2).unwrap();
    let vols = bs.implied_volatility(&options, &quotes).unwrap();
    for vol in vols {
        assert_abs_diff_eq!(vol, 0.2, epsilon = 1e-3);
    }
}

#[test]
fn test_negative_correlation_produces_skew() {
    let pricer = HestonAnalyticPricer::new(HestonParams::default());
    let options: Vec<OptionSpec> = [80.0, 100.0, 120.0]
        .iter()
        .map(|&k| OptionSpec::call(k, 1.0).unwrap())
        .collect();
    let quotes = pricer.npv(&options).unwrap();

    let bs = BlackScholes::new(100.0, 0.0, 0.0, 0.2).unwrap();
    let vols = bs.implied_volatility(&options, &quotes).unwrap();
    assert!(vols[0] > vols[1] && vols[1] > vols[2], "vols = {:?}", vols);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_expired_options_mixed_into_live_batch() {
    let pricer = HestonAnalyticPricer::new(HestonParams::default());
    let options = [
        OptionSpec::put(110.0, 0.0).unwrap(),
        OptionSpec::call(100.0, 1.0).unwrap(),
        OptionSpec::call(90.0, 0.0).unwrap().with_spot(95.0).unwrap(),
    ];
    let prices = pricer.npv(&options).unwrap();
    assert_eq!(prices[0], 10.0);
    assert_abs_diff_eq!(prices[1], 7.615_746_917_866_517, epsilon = 1e-6);
    assert_eq!(prices[2], 5.0);
}

#[test]
fn test_spot_override_matches_model_spot() {
    let base = HestonAnalyticPricer::new(HestonParams::default());
    let moved = HestonAnalyticPricer::new(HestonParams::default().with_s0(110.0).unwrap());
    let option = OptionSpec::call(100.0, 1.0).unwrap();

    let overridden = base.npv_one(&option.with_spot(110.0).unwrap()).unwrap();
    assert_abs_diff_eq!(overridden, moved.npv_one(&option).unwrap(), epsilon = 1e-6);
}

#[test]
fn test_call_delta_between_zero_and_one() {
    let pricer = HestonAnalyticPricer::new(HestonParams::default());
    let options: Vec<OptionSpec> = [80.0, 100.0, 120.0]
        .iter()
        .map(|&k| OptionSpec::call(k, 1.0).unwrap())
        .collect();
    let delta = pricer.delta(&options).unwrap();
    assert!(delta.iter().all(|&d| d > 0.0 && d < 1.0));
    assert!(delta.windows(2).all(|w| w[0] > w[1]));

    let gamma = pricer.gamma(&options).unwrap();
    assert!(gamma.iter().all(|&g| g > 0.0));

    let vega = pricer.vega(&options).unwrap();
    assert!(vega.iter().all(|&v| v > 0.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_put_call_parity(
        strike in 60.0f64..150.0,
        tau in 0.1f64..3.0,
        r in -0.01f64..0.08,
        q in 0.0f64..0.05,
    ) {
        let params = HestonParams::default()
            .with_risk_free_rate(r)
            .and_then(|p| p.with_dividend_yield(q))
            .unwrap();
        let pricer = HestonAnalyticPricer::new(params);
        let options = [
            OptionSpec::call(strike, tau).unwrap(),
            OptionSpec::put(strike, tau).unwrap(),
        ];
        let prices = pricer.npv(&options).unwrap();
        let forward = 100.0 * (-q * tau).exp() - strike * (-r * tau).exp();
        prop_assert!((prices[0] - prices[1] - forward).abs() < 1e-9);
    }

    #[test]
    fn prop_call_decreasing_in_strike(
        strike in 60.0f64..150.0,
        gap in 1.0f64..20.0,
        tau in 0.1f64..3.0,
    ) {
        let pricer = HestonAnalyticPricer::new(HestonParams::default());
        let options = [
            OptionSpec::call(strike, tau).unwrap(),
            OptionSpec::call(strike + gap, tau).unwrap(),
        ];
        let prices = pricer.npv(&options).unwrap();
        prop_assert!(prices[0] > prices[1]);
    }
}
