use anyhow::{Context, Result};
use clap::Args;
use rbm_core::{PathConfig, RunConfig, SpinBasis, Theta};
use rbm_models::{
    check_normalisation_many, epoch_distributions, kl_divergence, learned_distribution,
    log_likelihood_trace, periodic_chain_distribution, train_from,
};
use rbm_samplers::{RngKey, RngSource, UniformSource};
use rbm_store::{RunArchive, RunManifest, RunStore};
use std::path::{Path, PathBuf};
use std::time::Instant;

const LOGLIK_PLOT: &str = "loglik.svg";
const DIST_PLOT: &str = "learned_distribution.svg";

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of visible units (length of the chain)
    #[arg(long, default_value_t = 10)]
    pub visible: usize,

    /// Number of hidden units
    #[arg(long, default_value_t = 4)]
    pub hidden: usize,

    /// CD chains per gradient step
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Gradient steps in every epoch
    #[arg(long, default_value_t = 30)]
    pub steps_per_epoch: usize,

    /// Learning rate of each epoch, comma separated
    #[arg(long, value_delimiter = ',', default_value = "1,0.5,0.25,0.125")]
    pub alphas: Vec<f64>,

    /// Consecutive epochs run at each learning rate
    #[arg(long, default_value_t = 1)]
    pub repeats: usize,

    /// Gibbs rounds per CD chain
    #[arg(long, default_value_t = 1)]
    pub cd_depth: usize,

    /// Temperature of the periodic-chain target
    #[arg(long, default_value_t = 1.0)]
    pub temperature: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value = "ising")]
    pub basis: SpinBasis,
}

impl TrainArgs {
    /// Schedule with every learning rate repeated `repeats` times.
    pub fn run_config(&self) -> Result<RunConfig> {
        let learning_rates: Vec<f64> = self
            .alphas
            .iter()
            .flat_map(|&alpha| std::iter::repeat(alpha).take(self.repeats))
            .collect();
        let steps = vec![self.steps_per_epoch; learning_rates.len()];
        let depths = vec![self.cd_depth; learning_rates.len()];
        let config = RunConfig::from_lists(
            &steps,
            &learning_rates,
            &depths,
            self.visible,
            self.hidden,
            self.batch_size,
        )?;
        config.validate().context("Invalid training schedule")?;
        Ok(config)
    }
}

/// Summary of an analysed run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub run_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub final_log_likelihood: f64,
    pub initial_kl: f64,
    pub final_kl: f64,
}

pub fn train(paths: &PathConfig, args: &TrainArgs) -> Result<()> {
    let config = args.run_config()?;
    let target = periodic_chain_distribution(args.visible, args.temperature)
        .context("Failed to build the target distribution")?;

    println!(
        "Training RBM: {} visible, {} hidden, basis {}",
        config.n_visible, config.n_hidden, args.basis
    );
    println!(
        "  {} epochs x {} steps, batch {}, CD-{}",
        config.n_epochs(),
        args.steps_per_epoch,
        config.batch_size,
        args.cd_depth
    );

    let start = Instant::now();
    let (init_key, chain_key) = RngKey::new(args.seed).split_two();
    let mut init_source = RngSource::from_key(init_key);
    let initial = Theta::random_uniform(config.n_visible, config.n_hidden, || {
        init_source.uniform()
    });
    let mut source = RngSource::from_key(chain_key);
    let run = train_from(initial, &config, &target, args.basis, &mut source)
        .context("Training failed")?;
    println!(
        "  done: {} steps in {:.2}s",
        run.history.len(),
        start.elapsed().as_secs_f64()
    );

    let store = RunStore::new(paths.clone());
    let archive = RunArchive {
        manifest: RunManifest {
            basis: args.basis,
            temperature: Some(args.temperature),
            seed: Some(args.seed),
            config,
        },
        target,
        history: run.history,
    };
    let run_dir = store.save(&archive)?;

    let analysis = analyze_archive(&store, &run_dir, &archive, true)?;
    print_analysis(&analysis);
    Ok(())
}

pub fn analyze(paths: &PathConfig, run_dir: &Path, recompute: bool) -> Result<Analysis> {
    let store = RunStore::new(paths.clone());
    let run_dir = store.resolve(run_dir);
    let archive = store
        .load(&run_dir)
        .with_context(|| format!("Failed to load run {:?}", run_dir))?;
    let analysis = analyze_archive(&store, &run_dir, &archive, recompute)?;
    print_analysis(&analysis);
    Ok(analysis)
}

/// Fill the diagnostic caches if needed and render both figures.
fn analyze_archive(
    store: &RunStore,
    run_dir: &Path,
    archive: &RunArchive,
    recompute: bool,
) -> Result<Analysis> {
    let config = &archive.manifest.config;
    let history = &archive.history;

    let cached = if recompute {
        None
    } else {
        store.load_log_likelihood(run_dir)?
    };
    let trace = match cached {
        Some(trace) if trace.len() == history.len() => trace,
        _ => {
            tracing::info!(steps = history.len(), "computing log-likelihood trace");
            let trace = log_likelihood_trace(history)?;
            store.save_log_likelihood(run_dir, &trace)?;
            trace
        }
    };

    let cached = if recompute {
        None
    } else {
        store.load_distributions(run_dir)?
    };
    let distributions = match cached {
        Some(rows) if rows.len() == epochs_with_steps(config) => rows,
        _ => {
            tracing::info!(epochs = config.n_epochs(), "computing learned distributions");
            let rows: Vec<Vec<f64>> = epoch_distributions(history, config)?
                .into_iter()
                .map(|(_, dist)| dist)
                .collect();
            store.save_distributions(run_dir, &rows)?;
            rows
        }
    };

    let target = archive.target.probabilities();
    let initial = learned_distribution(history.initial_theta(), history.basis())?;
    let initial_kl = kl_divergence(target, &initial)?;
    let final_learned = learned_distribution(history.final_theta(), history.basis())?;
    let final_kl = kl_divergence(target, &final_learned)?;

    let plots_dir = store.plots_dir(&archive.manifest);
    std::fs::create_dir_all(&plots_dir)
        .with_context(|| format!("Failed to create plots directory {:?}", plots_dir))?;
    rbm_viz::plot_log_likelihood(&plots_dir.join(LOGLIK_PLOT), &trace, &config.epoch_boundaries())?;
    rbm_viz::plot_learned_distribution(&plots_dir.join(DIST_PLOT), &distributions, target)?;

    Ok(Analysis {
        run_dir: run_dir.to_path_buf(),
        plots_dir,
        final_log_likelihood: trace.last().copied().unwrap_or(f64::NAN),
        initial_kl,
        final_kl,
    })
}

fn epochs_with_steps(config: &RunConfig) -> usize {
    config.epochs.iter().filter(|e| e.steps > 0).count()
}

fn print_analysis(analysis: &Analysis) {
    println!("Run:   {}", analysis.run_dir.display());
    println!("Plots: {}", analysis.plots_dir.display());
    println!(
        "  final batch log-likelihood: {:.4}",
        analysis.final_log_likelihood
    );
    println!(
        "  KL(target || model): {:.4} -> {:.4}",
        analysis.initial_kl, analysis.final_kl
    );
}

pub fn selftest(
    max_visible: usize,
    max_hidden: usize,
    checks: usize,
    tolerance: f64,
    basis: SpinBasis,
    seed: u64,
) -> Result<()> {
    let mut source = RngSource::from_seed(seed);
    let report =
        check_normalisation_many(max_visible, max_hidden, checks, tolerance, basis, &mut source)?;

    println!(
        "Checked {} parameter sets in {:.2}s",
        report.checked,
        report.elapsed.as_secs_f64()
    );
    for issue in &report.issues {
        println!(
            "  m={} n={}: sum p(v) = {:.12}",
            issue.n_visible, issue.n_hidden, issue.total
        );
    }
    anyhow::ensure!(
        report.all_normalised,
        "{} of {} parameter sets failed to normalise",
        report.issues.len(),
        report.checked
    );
    println!("All distributions normalised");
    Ok(())
}
