//! Price command implementation
//!
//! Prices a strip of European options with the Fourier-inversion pricer or
//! the Monte Carlo pricer and reports Black-Scholes implied volatilities.

use pricer_core::types::{ensure_finite, PricingError};
use pricer_models::analytical::{BlackScholes, HestonAnalyticPricer};
use pricer_models::instruments::{OptionFlag, OptionGreeks, OptionPricer, OptionSpec};
use pricer_pricing::mc::HestonMonteCarloPricer;
use serde::Serialize;
use tracing::info;

use crate::config::HestonppConfig;
use crate::{CliError, Result};

/// Volatility the Black-Scholes inverter is constructed with; the solver
/// does not depend on it.
const SEED_VOLATILITY: f64 = 0.2;

/// One priced option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub strike: f64,
    pub tau: f64,
    pub flag: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_error: Option<f64>,
    pub implied_vol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
}

/// Run the price command
pub fn run(
    config: &HestonppConfig,
    strikes: &[f64],
    tau: f64,
    flag: &str,
    method: &str,
    num_paths: Option<usize>,
    format: &str,
) -> Result<()> {
    info!("Pricing {} option(s), method {}", strikes.len(), method);
    let rows = compute(config, strikes, tau, flag, method, num_paths)?;
    println!("{}", render(&rows, format)?);
    Ok(())
}

/// Price every strike at maturity `tau`.
pub fn compute(
    config: &HestonppConfig,
    strikes: &[f64],
    tau: f64,
    flag: &str,
    method: &str,
    num_paths: Option<usize>,
) -> Result<Vec<PriceRow>> {
    if strikes.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one --strike is required".to_string(),
        ));
    }
    let flag: OptionFlag = flag.parse()?;
    let params = config.params()?;
    let options = strikes
        .iter()
        .map(|&k| OptionSpec::new(k, tau, flag))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let (prices, std_errors, greeks) = match method {
        "analytic" => {
            let pricer = HestonAnalyticPricer::new(params);
            let prices = pricer.npv(&options)?;
            let greeks = (
                pricer.delta(&options)?,
                pricer.gamma(&options)?,
                pricer.vega(&options)?,
            );
            (prices, None, Some(greeks))
        }
        "mc" => {
            let mut section = config.simulation.clone();
            if let Some(n) = num_paths {
                section.n_paths = n;
            }
            let pricer = HestonMonteCarloPricer::new(params, section.to_config()?);
            let results = pricer.price_with_error(&options)?;
            let prices: Vec<f64> = results.iter().map(|r| r.price).collect();
            let errors = results.iter().map(|r| r.std_error).collect::<Vec<_>>();
            (prices, Some(errors), None)
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown method: {}. Supported: analytic, mc",
                other
            )));
        }
    };
    ensure_finite(&prices)?;

    let inverter = BlackScholes::new(
        params.s0(),
        params.risk_free_rate(),
        params.dividend_yield(),
        SEED_VOLATILITY,
    )
    .map_err(PricingError::from)?;
    let vols = inverter.implied_volatility(&options, &prices)?;

    Ok(options
        .iter()
        .enumerate()
        .map(|(k, option)| PriceRow {
            strike: option.strike(),
            tau: option.tau(),
            flag: option.flag().to_string(),
            price: prices[k],
            std_error: std_errors.as_ref().map(|e| e[k]),
            implied_vol: Some(vols[k]).filter(|v| v.is_finite()),
            delta: greeks.as_ref().map(|g| g.0[k]),
            gamma: greeks.as_ref().map(|g| g.1[k]),
            vega: greeks.as_ref().map(|g| g.2[k]),
        })
        .collect())
}

/// Format priced rows as `table` or `json`.
pub fn render(rows: &[PriceRow], format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        "table" => Ok(table(rows)),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: json, table",
            other
        ))),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v))
}

fn table(rows: &[PriceRow]) -> String {
    let mut out = String::new();
    out.push_str("┌──────────┬────────┬──────┬────────────┬────────────┬────────────┬────────────┐\n");
    out.push_str("│ Strike   │ Tau    │ Flag │ Price      │ Std Err    │ Impl Vol   │ Delta      │\n");
    out.push_str("├──────────┼────────┼──────┼────────────┼────────────┼────────────┼────────────┤\n");
    for row in rows {
        out.push_str(&format!(
            "│ {:<8.2} │ {:<6.3} │ {:<4} │ {:<10.6} │ {:<10} │ {:<10} │ {:<10} │\n",
            row.strike,
            row.tau,
            row.flag,
            row.price,
            cell(row.std_error),
            cell(row.implied_vol),
            cell(row.delta),
        ));
    }
    out.push_str("└──────────┴────────┴──────┴────────────┴────────────┴────────────┴────────────┘");
    out
}
