use anyhow::{Context, Result};
use rbm_core::{DataDistribution, PathConfig, RunConfig, SpinBasis};
use rbm_models::TrainingHistory;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "run.toml";
const HISTORY_FILE: &str = "history.json";
const TARGET_FILE: &str = "target.json";

/// Contents of `run.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub basis: SpinBasis,
    /// Temperature of the periodic-chain target, if that is what was learned.
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    pub config: RunConfig,
}

/// Everything needed to analyse a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunArchive {
    pub manifest: RunManifest,
    pub target: DataDistribution,
    pub history: TrainingHistory,
}

/// Directory name for a run, e.g. `m10_n4_b100_basis-ising_steps30-30_alpha1-0.5_k1-1`.
pub fn run_dir_name(config: &RunConfig, basis: SpinBasis) -> String {
    let join = |values: Vec<String>| values.join("-");
    let steps = join(config.epochs.iter().map(|e| e.steps.to_string()).collect());
    let alphas = join(config.epochs.iter().map(|e| e.learning_rate.to_string()).collect());
    let depths = join(config.epochs.iter().map(|e| e.cd_depth.to_string()).collect());
    let basis = match basis {
        SpinBasis::Binary => "binary",
        SpinBasis::Ising => "ising",
    };
    format!(
        "m{}_n{}_b{}_basis-{}_steps{}_alpha{}_k{}",
        config.n_visible, config.n_hidden, config.batch_size, basis, steps, alphas, depths
    )
}

/// Reads and writes run directories under a [`PathConfig`]'s data directory.
#[derive(Debug, Clone)]
pub struct RunStore {
    paths: PathConfig,
}

impl RunStore {
    pub fn new(paths: PathConfig) -> Self {
        RunStore { paths }
    }

    pub fn paths(&self) -> &PathConfig {
        &self.paths
    }

    /// Where a run with this manifest is stored.
    pub fn run_dir(&self, manifest: &RunManifest) -> PathBuf {
        self.paths
            .data_dir()
            .join(run_dir_name(&manifest.config, manifest.basis))
    }

    /// Where plots for a run with this manifest are written.
    pub fn plots_dir(&self, manifest: &RunManifest) -> PathBuf {
        self.paths
            .plots_dir()
            .join(run_dir_name(&manifest.config, manifest.basis))
    }

    /// Resolve a user-supplied run directory: absolute or existing paths are
    /// used as-is, anything else is taken relative to the data directory.
    pub fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() || dir.exists() {
            dir.to_path_buf()
        } else {
            self.paths.data_dir().join(dir)
        }
    }

    /// Write a run, replacing any previous run with the same parameters.
    pub fn save(&self, archive: &RunArchive) -> Result<PathBuf> {
        let dir = self.run_dir(&archive.manifest);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create run directory {:?}", dir))?;

        let manifest = toml::to_string_pretty(&archive.manifest)
            .context("Failed to serialize run manifest")?;
        write_file(&dir.join(MANIFEST_FILE), manifest.as_bytes())?;

        let history =
            serde_json::to_vec(&archive.history).context("Failed to serialize training history")?;
        write_file(&dir.join(HISTORY_FILE), &history)?;

        let target =
            serde_json::to_vec(&archive.target).context("Failed to serialize target distribution")?;
        write_file(&dir.join(TARGET_FILE), &target)?;

        tracing::info!(dir = %dir.display(), steps = archive.history.len(), "saved run");
        Ok(dir)
    }

    /// Load a run saved by [`save`](Self::save).
    pub fn load(&self, dir: &Path) -> Result<RunArchive> {
        let dir = self.resolve(dir);

        let manifest_path = dir.join(MANIFEST_FILE);
        let text = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {:?}", manifest_path))?;
        let manifest: RunManifest = toml::from_str(&text)
            .with_context(|| format!("Failed to parse run manifest {:?}", manifest_path))?;

        let history_path = dir.join(HISTORY_FILE);
        let bytes = fs::read(&history_path)
            .with_context(|| format!("Failed to read {:?}", history_path))?;
        let history: TrainingHistory = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse training history {:?}", history_path))?;

        history
            .check_consistent(&manifest.config)
            .with_context(|| format!("Training history in {:?} does not match run.toml", dir))?;
        anyhow::ensure!(
            history.basis() == manifest.basis,
            "history basis {} does not match manifest basis {}",
            history.basis(),
            manifest.basis
        );

        let target_path = dir.join(TARGET_FILE);
        let bytes = fs::read(&target_path)
            .with_context(|| format!("Failed to read {:?}", target_path))?;
        let target: DataDistribution = serde_json::from_slice(&bytes)
            .with_context(|| format!("Stored target distribution {:?} is invalid", target_path))?;
        anyhow::ensure!(
            target.vector_len() == manifest.config.n_visible,
            "target vectors have {} units but the run has {} visible units",
            target.vector_len(),
            manifest.config.n_visible
        );

        Ok(RunArchive {
            manifest,
            target,
            history,
        })
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}
