//! Simulate command implementation
//!
//! Runs the Heston(++) path simulator and writes the spot, volatility and
//! adjusted-correlation tables as CSV, one row per (path, step), path-major.

use std::io::Write;
use std::path::Path;

use pricer_pricing::mc::{HestonPathSimulator, SimulatedPathSet};
use serde::Serialize;
use tracing::info;

use crate::config::{HestonppConfig, SimulationSection};
use crate::Result;

/// Command line overrides of the `[simulation]` table.
#[derive(Debug, Clone, Default)]
pub struct SimulateOverrides {
    pub n_paths: Option<usize>,
    pub n_steps: Option<usize>,
    pub horizon: Option<f64>,
    pub discretisation: Option<String>,
    pub scheme: Option<String>,
    pub measure: Option<String>,
    pub seed: Option<u64>,
}

impl SimulateOverrides {
    /// `section` with every set override applied.
    pub fn apply(&self, section: &SimulationSection) -> SimulationSection {
        let mut out = section.clone();
        if let Some(n) = self.n_paths {
            out.n_paths = n;
        }
        if let Some(n) = self.n_steps {
            out.n_steps = n;
        }
        if let Some(h) = self.horizon {
            out.horizon = h;
        }
        if let Some(d) = &self.discretisation {
            out.discretisation = d.clone();
        }
        if let Some(s) = &self.scheme {
            out.scheme = s.clone();
        }
        if let Some(m) = &self.measure {
            out.measure = m.clone();
        }
        if self.seed.is_some() {
            out.seed = self.seed;
        }
        out
    }
}

#[derive(Debug, Serialize)]
struct PathRow {
    path: usize,
    step: usize,
    time: f64,
    spot: f64,
    vol: f64,
    rho_adj: f64,
}

/// Run the simulate command
pub fn run(config: &HestonppConfig, overrides: &SimulateOverrides, output: &Path) -> Result<()> {
    let section = overrides.apply(&config.simulation);
    let simulator = HestonPathSimulator::new(config.params()?, section.to_config()?);
    let paths = simulator.simulate_default();

    let file = std::fs::File::create(output)?;
    let rows = write_csv(&paths, simulator.config().dt(), file)?;
    info!(
        "Wrote {} rows ({} paths x {} steps) to {}",
        rows,
        paths.n_paths(),
        paths.n_steps() + 1,
        output.display()
    );
    Ok(())
}

/// Write `paths` as CSV to `writer`; returns the number of data rows.
pub fn write_csv<W: Write>(paths: &SimulatedPathSet, dt: f64, writer: W) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for path in 0..paths.n_paths() {
        let columns = paths
            .spot_path(path)
            .iter()
            .zip(paths.vol_path(path))
            .zip(paths.rho_adj_path(path));
        for (step, ((&spot, &vol), &rho_adj)) in columns.enumerate() {
            out.serialize(PathRow {
                path,
                step,
                time: step as f64 * dt,
                spot,
                vol,
                rho_adj,
            })?;
            rows += 1;
        }
    }
    out.flush()?;
    Ok(rows)
}
