//! Monte Carlo prices against the Fourier-inversion reference.
//!
//! Both pricers share the model and option definitions of `pricer_models`,
//! so agreement within a few standard errors checks the simulator recurrence
//! and the transform pricer against each other.

use pricer_models::analytical::HestonAnalyticPricer;
use pricer_models::instruments::{OptionPricer, OptionSpec};
use pricer_models::models::HestonParams;
use pricer_pricing::mc::{HestonMonteCarloPricer, HestonSimulationConfig, PricingResult};

/// Discretisation bias allowance on top of the statistical error.
const BIAS: f64 = 0.03;

fn template(seed: u64) -> HestonSimulationConfig {
    HestonSimulationConfig::builder()
        .n_paths(50_000)
        .n_steps(100)
        .horizon(1.0)
        .seed(seed)
        .build()
        .unwrap()
}

fn assert_close(mc: &PricingResult, reference: f64) {
    let tolerance = 4.0 * mc.std_error + BIAS;
    assert!(
        (mc.price - reference).abs() < tolerance,
        "MC {} +/- {} vs analytic {}",
        mc.price,
        mc.std_error,
        reference
    );
}

#[test]
fn test_canonical_strip_matches_analytic() {
    let params = HestonParams::default();
    let options: Vec<OptionSpec> = [90.0, 100.0, 110.0]
        .iter()
        .flat_map(|&k| [OptionSpec::call(k, 1.0).unwrap(), OptionSpec::put(k, 1.0).unwrap()])
        .collect();

    let analytic = HestonAnalyticPricer::new(params).npv(&options).unwrap();
    let mc = HestonMonteCarloPricer::new(params, template(42))
        .price_with_error(&options)
        .unwrap();

    for (m, a) in mc.iter().zip(&analytic) {
        assert!(m.std_error > 0.0);
        assert_close(m, *a);
    }
}

#[test]
fn test_multiple_maturities_with_carry() {
    let params = HestonParams::default()
        .with_risk_free_rate(0.03)
        .and_then(|p| p.with_dividend_yield(0.01))
        .unwrap();
    let options = [
        OptionSpec::call(100.0, 0.5).unwrap(),
        OptionSpec::put(95.0, 1.0).unwrap(),
        OptionSpec::call(105.0, 2.0).unwrap(),
        OptionSpec::call(100.0, 0.0).unwrap(),
    ];

    let analytic = HestonAnalyticPricer::new(params).npv(&options).unwrap();
    let mc = HestonMonteCarloPricer::new(params, template(7))
        .price_with_error(&options)
        .unwrap();

    for (m, a) in mc.iter().zip(&analytic).take(3) {
        assert_close(m, *a);
    }
    assert_eq!(mc[3].price, 0.0);
    assert_eq!(mc[3].std_error, 0.0);
}

#[test]
fn test_v0_override_honoured() {
    let params = HestonParams::default();
    let option = OptionSpec::call(100.0, 1.0).unwrap().with_v0(0.09).unwrap();

    let analytic = HestonAnalyticPricer::new(params).npv_one(&option).unwrap();
    let mc = HestonMonteCarloPricer::new(params, template(3))
        .price_with_error(&[option])
        .unwrap();
    assert_close(&mc[0], analytic);
}
