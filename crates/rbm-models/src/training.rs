//! Training loop driver.
//!
//! One CD step is: draw a fresh batch from the current parameters, compute
//! `ln Z` of those parameters from scratch, estimate the gradient and take a
//! gradient-ascent step. The driver repeats this for every step of every
//! epoch and records each step in an append-only [`TrainingHistory`] at the
//! index given by [`RunConfig::global_step_index`].

use crate::energy::{log_partition, IsingRbm};
use crate::gradient::{estimate_gradient, ThetaGradient};
use crate::update::apply_gradient;
use rbm_core::{
    Batch, DataDistribution, EpochSchedule, RbmError, Result, RunConfig, SpinBasis, Theta,
};
use rbm_samplers::{generate_batch, UniformSource};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Record of one completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub global_step: usize,
    pub epoch: usize,
    pub step_in_epoch: usize,
    pub learning_rate: f64,
    pub cd_depth: usize,
    /// `ln Z` of the parameters the batch was drawn from.
    pub log_partition: f64,
    /// Parameters after the update.
    pub theta: Theta,
    pub batch: Batch,
}

/// Initial parameters plus one entry per step, in global step order.
///
/// Only the training driver appends; everything else reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    basis: SpinBasis,
    initial_theta: Theta,
    entries: Vec<HistoryEntry>,
}

impl TrainingHistory {
    pub(crate) fn new(basis: SpinBasis, initial_theta: Theta) -> Self {
        TrainingHistory {
            basis,
            initial_theta,
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        debug_assert_eq!(entry.global_step, self.entries.len());
        self.entries.push(entry);
    }

    /// Basis the run was trained in.
    pub fn basis(&self) -> SpinBasis {
        self.basis
    }

    pub fn initial_theta(&self) -> &Theta {
        &self.initial_theta
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, global_step: usize) -> Option<&HistoryEntry> {
        self.entries.get(global_step)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that this history could have been produced by `config`: one
    /// entry per global step in order, and every parameter set and batch
    /// sized for the configured layers and batch size.
    pub fn check_consistent(&self, config: &RunConfig) -> Result<()> {
        if self.entries.len() != config.total_steps() {
            return Err(RbmError::ShapeMismatch {
                what: "history entries",
                expected: config.total_steps(),
                actual: self.entries.len(),
            });
        }
        let shape = Theta::zeros(config.n_visible, config.n_hidden);
        shape.require_same_shape(&self.initial_theta)?;

        for (t, entry) in self.entries.iter().enumerate() {
            let expected = config.global_step_index(entry.epoch, entry.step_in_epoch)?;
            if entry.global_step != t || expected != t {
                return Err(RbmError::IndexOutOfRange {
                    index: entry.global_step,
                    len: self.entries.len(),
                });
            }
            shape.require_same_shape(&entry.theta)?;
            if entry.batch.len() != config.batch_size {
                return Err(RbmError::ShapeMismatch {
                    what: "history batch",
                    expected: config.batch_size,
                    actual: entry.batch.len(),
                });
            }
            for (model_v, data_v) in entry.batch.pairs() {
                for v in [model_v, data_v] {
                    v.require_basis(self.basis)?
                        .require_len("history batch sample", config.n_visible)?;
                }
            }
        }
        Ok(())
    }

    /// Parameters after the last step, or the initial ones for an empty history.
    pub fn final_theta(&self) -> &Theta {
        self.entries
            .last()
            .map(|e| &e.theta)
            .unwrap_or(&self.initial_theta)
    }
}

/// Result of [`train`] / [`train_from`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRun {
    pub final_theta: Theta,
    pub history: TrainingHistory,
}

/// Everything one CD step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub theta: Theta,
    pub batch: Batch,
    pub log_partition: f64,
    pub gradient: ThetaGradient,
}

/// Perform a single CD step from `theta`.
pub fn cd_step<S>(
    theta: &Theta,
    schedule: &EpochSchedule,
    batch_size: usize,
    data: &DataDistribution,
    basis: SpinBasis,
    source: &mut S,
) -> Result<StepOutcome>
where
    S: UniformSource + ?Sized,
{
    let rbm = IsingRbm::new(theta, basis);
    let batch = generate_batch(&rbm, schedule.cd_depth, batch_size, data, source)?;
    let log_partition = log_partition(theta, basis)?;
    let gradient = estimate_gradient(&rbm, &batch)?;
    let next = apply_gradient(theta, &gradient, schedule.learning_rate)?;

    Ok(StepOutcome {
        theta: next,
        batch,
        log_partition,
        gradient,
    })
}

fn check_data(config: &RunConfig, data: &DataDistribution) -> Result<()> {
    if data.vector_len() != config.n_visible {
        return Err(RbmError::ShapeMismatch {
            what: "data vectors",
            expected: config.n_visible,
            actual: data.vector_len(),
        });
    }
    Ok(())
}

/// Train from parameters drawn uniformly on `(-1, 1)` with `source`.
pub fn train<S>(
    config: &RunConfig,
    data: &DataDistribution,
    basis: SpinBasis,
    source: &mut S,
) -> Result<TrainingRun>
where
    S: UniformSource + ?Sized,
{
    config.validate()?;
    check_data(config, data)?;
    let initial = Theta::random_uniform(config.n_visible, config.n_hidden, || source.uniform());
    train_from(initial, config, data, basis, source)
}

/// Train from the given initial parameters.
pub fn train_from<S>(
    initial: Theta,
    config: &RunConfig,
    data: &DataDistribution,
    basis: SpinBasis,
    source: &mut S,
) -> Result<TrainingRun>
where
    S: UniformSource + ?Sized,
{
    config.validate()?;
    check_data(config, data)?;
    initial.require_same_shape(&Theta::zeros(config.n_visible, config.n_hidden))?;

    let start = Instant::now();
    tracing::info!(
        n_visible = config.n_visible,
        n_hidden = config.n_hidden,
        batch_size = config.batch_size,
        epochs = config.n_epochs(),
        total_steps = config.total_steps(),
        %basis,
        "starting CD training"
    );

    let mut history = TrainingHistory::new(basis, initial.clone());
    let mut theta = initial;

    for (epoch, schedule) in config.epochs.iter().enumerate() {
        tracing::info!(
            epoch,
            steps = schedule.steps,
            learning_rate = schedule.learning_rate,
            cd_depth = schedule.cd_depth,
            "epoch"
        );

        for step in 0..schedule.steps {
            let global_step = config.global_step_index(epoch, step)?;
            let outcome = cd_step(&theta, schedule, config.batch_size, data, basis, source)?;
            tracing::debug!(
                global_step,
                log_partition = outcome.log_partition,
                max_gradient = outcome.gradient.max_abs(),
                "cd step"
            );

            theta = outcome.theta;
            history.push(HistoryEntry {
                global_step,
                epoch,
                step_in_epoch: step,
                learning_rate: schedule.learning_rate,
                cd_depth: schedule.cd_depth,
                log_partition: outcome.log_partition,
                theta: theta.clone(),
                batch: outcome.batch,
            });
        }
    }

    tracing::info!(
        steps = history.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "training finished"
    );

    Ok(TrainingRun {
        final_theta: theta,
        history,
    })
}
