//! Check command implementation
//!
//! Validates the configuration and prints the model parameters with the
//! Feller diagnostics.

use std::fmt;

use pricer_models::models::HestonParams;
use pricer_pricing::mc::HestonSimulationConfig;

use crate::config::HestonppConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &HestonppConfig) -> Result<()> {
    println!("{}", report(config)?);
    Ok(())
}

/// Validate `config` and describe it.
pub fn report(config: &HestonppConfig) -> Result<String> {
    let params = config.params()?;
    let simulation = config.simulation_config()?;
    params.warn_if_feller_violated();
    Ok(describe(&params, &simulation))
}

fn line(name: &str, value: impl fmt::Display) -> String {
    format!("  {:<16}{}\n", name, value)
}

fn describe(p: &HestonParams, s: &HestonSimulationConfig) -> String {
    let mut out = format!("hestonpp v{}\n\nModel\n", env!("CARGO_PKG_VERSION"));
    for (name, value) in [
        ("kappa", p.kappa()),
        ("theta", p.theta()),
        ("sigma", p.sigma()),
        ("rho", p.rho()),
        ("phi", p.phi()),
        ("v0", p.v0()),
        ("s0", p.s0()),
        ("mu", p.mu()),
        ("risk_free_rate", p.risk_free_rate()),
        ("dividend_yield", p.dividend_yield()),
    ] {
        out.push_str(&line(name, value));
    }

    out.push_str("\nFeller condition (2 kappa theta > sigma^2)\n");
    out.push_str(&line("ratio", format!("{:.6}", p.feller_ratio())));
    let status = if p.satisfies_feller() {
        "satisfied"
    } else {
        "violated: variance can reach zero"
    };
    out.push_str(&line("status", status));

    out.push_str("\nSimulation\n");
    out.push_str(&line("n_paths", s.n_paths()));
    out.push_str(&line("n_steps", s.n_steps()));
    out.push_str(&line("horizon", s.horizon()));
    out.push_str(&line("discretisation", s.discretisation()));
    out.push_str(&line("scheme", s.scheme()));
    out.push_str(&line("measure", s.measure()));
    let seed = s.seed().map_or_else(|| "none".to_string(), |v| v.to_string());
    out.push_str(&line("seed", seed));
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_canonical() {
        let text = report(&HestonppConfig::default()).unwrap();
        assert!(text.contains("kappa"));
        assert!(text.contains("satisfied"));
        assert!(text.contains("milstein"));
        assert!(text.contains("seed            none"));
    }

    #[test]
    fn test_report_flags_feller_violation() {
        let config =
            HestonppConfig::from_toml("[model]\nkappa = 0.5\nsigma = 0.5\n").unwrap();
        let text = report(&config).unwrap();
        assert!(text.contains("violated"));
        assert!(text.contains("0.160000"));
    }

    #[test]
    fn test_report_line_layout() {
        let config = HestonppConfig::from_toml("[simulation]\nseed = 42\n").unwrap();
        let text = report(&config).unwrap();
        assert!(text.starts_with("hestonpp v"));
        assert!(text.contains("\nModel\n  kappa           2\n"));
        assert!(text.contains("\n  ratio           1.777778\n"));
        assert!(text.ends_with("  seed            42"));
    }

    #[test]
    fn test_report_rejects_invalid_model() {
        let config = HestonppConfig::from_toml("[model]\nv0 = -0.01\n").unwrap();
        assert!(report(&config).is_err());
    }
}
