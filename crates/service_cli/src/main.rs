//! hestonpp - Command Line Operations for Heston(++) Pricing
//!
//! # Commands
//!
//! - `hestonpp price --strike <K> --tau <T>` - Price European options
//! - `hestonpp simulate --output <file>` - Simulate paths to CSV
//! - `hestonpp check` - Validate configuration and print Feller diagnostics
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate wires the configuration file to the
//! pricer crates and formats their output.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::simulate::SimulateOverrides;
use config::{HestonppConfig, DEFAULT_CONFIG_FILE};

/// Heston(++) pricing and simulation CLI
#[derive(Parser)]
#[command(name = "hestonpp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price European options
    Price {
        /// Strike price (repeat for a strip)
        #[arg(short = 'k', long = "strike", required = true)]
        strikes: Vec<f64>,

        /// Time to maturity in years
        #[arg(short, long)]
        tau: f64,

        /// Option type (call, put)
        #[arg(long, default_value = "call")]
        flag: String,

        /// Pricing method (analytic, mc)
        #[arg(short, long, default_value = "analytic")]
        method: String,

        /// Number of Monte Carlo paths (overrides the configuration)
        #[arg(short = 'n', long)]
        paths: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Simulate spot and volatility paths to CSV
    Simulate {
        /// Number of paths
        #[arg(short = 'n', long)]
        paths: Option<usize>,

        /// Number of time steps
        #[arg(short, long)]
        steps: Option<usize>,

        /// Horizon in years
        #[arg(long)]
        horizon: Option<f64>,

        /// Negative-variance policy (truncation, reflection)
        #[arg(long)]
        discretisation: Option<String>,

        /// Variance scheme (milstein, euler)
        #[arg(long)]
        scheme: Option<String>,

        /// Drift measure (rn, rw)
        #[arg(long)]
        measure: Option<String>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate configuration and print Feller diagnostics
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = HestonppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Price {
            strikes,
            tau,
            flag,
            method,
            paths,
            format,
        } => commands::price::run(&config, &strikes, tau, &flag, &method, paths, &format),
        Commands::Simulate {
            paths,
            steps,
            horizon,
            discretisation,
            scheme,
            measure,
            seed,
            output,
        } => {
            let overrides = SimulateOverrides {
                n_paths: paths,
                n_steps: steps,
                horizon,
                discretisation,
                scheme,
                measure,
                seed,
            };
            commands::simulate::run(&config, &overrides, &output)
        }
        Commands::Check => commands::check::run(&config),
    }
}
