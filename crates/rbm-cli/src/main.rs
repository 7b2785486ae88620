//! `rbm`: train, analyse and self-test exact Ising RBMs.
//!
//! # Usage
//!
//! ```bash
//! # Learn the periodic-chain distribution on 10 visible units
//! rbm train --visible 10 --hidden 4 --batch-size 100 \
//!     --steps-per-epoch 30 --alphas 1,0.5,0.25,0.125 --cd-depth 1
//!
//! # Re-render plots for a saved run (reuses cached diagnostics)
//! rbm analyze m10_n4_b100_basis-ising_steps30-30-30-30_alpha1-0.5-0.25-0.125_k1-1-1-1
//!
//! # Check that p(v|θ) normalises for random parameters
//! rbm selftest --max-visible 5 --max-hidden 5 --checks 3
//! ```

mod commands;

use clap::{Parser, Subcommand};
use rbm_core::{PathArgs, PathConfig, SpinBasis};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rbm", version, about = "Exact-enumeration RBM trained with contrastive divergence")]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Learn the periodic-chain distribution and save the run.
    Train(commands::TrainArgs),

    /// Recompute diagnostics for a saved run and render its plots.
    Analyze {
        /// Run directory (absolute, or relative to the data directory).
        run_dir: PathBuf,

        /// Ignore cached log-likelihood and distribution arrays.
        #[arg(long)]
        recompute: bool,
    },

    /// Check normalisation of p(v|θ) over random parameter sets.
    Selftest {
        #[arg(long, default_value_t = 5)]
        max_visible: usize,

        #[arg(long, default_value_t = 5)]
        max_hidden: usize,

        /// Random parameter sets per (visible, hidden) size.
        #[arg(long, default_value_t = 3)]
        checks: usize,

        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,

        #[arg(long, default_value = "ising")]
        basis: SpinBasis,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = PathConfig::from_path_args(cli.paths);

    match cli.command {
        Command::Train(args) => commands::train(&paths, &args),
        Command::Analyze { run_dir, recompute } => {
            commands::analyze(&paths, &run_dir, recompute).map(|_| ())
        }
        Command::Selftest {
            max_visible,
            max_hidden,
            checks,
            tolerance,
            basis,
            seed,
        } => commands::selftest(max_visible, max_hidden, checks, tolerance, basis, seed),
    }
}
