//! Offline diagnostics over a trained run.
//!
//! Everything here is exact: the partition function is recomputed for each
//! parameter set that is evaluated.

use crate::energy::{energy, log_partition, log_prob_visible};
use crate::training::TrainingHistory;
use rbm_core::{all_configurations_in, Batch, RbmError, Result, RunConfig, SpinBasis, SpinVector, Theta};
use rbm_samplers::LogSumExp;

/// Mean `ln p(v | θ)` over `samples`, each converted into `basis`.
pub fn log_likelihood(theta: &Theta, samples: &[SpinVector], basis: SpinBasis) -> Result<f64> {
    if samples.is_empty() {
        return Err(RbmError::EmptyBatch);
    }
    let log_z = log_partition(theta, basis)?;
    let total = samples.iter().try_fold(0.0, |acc, v| {
        log_prob_visible(&v.to_basis(basis), theta, log_z).map(|lp| acc + lp)
    })?;
    Ok(total / samples.len() as f64)
}

/// [`log_likelihood`] of a batch's data samples.
pub fn batch_log_likelihood(theta: &Theta, batch: &Batch, basis: SpinBasis) -> Result<f64> {
    log_likelihood(theta, batch.data_samples(), basis)
}

/// One value per history entry: the entry's post-step parameters scored on
/// its own batch. Index `t` of the result is global step `t`.
pub fn log_likelihood_trace(history: &TrainingHistory) -> Result<Vec<f64>> {
    let basis = history.basis();
    history
        .entries()
        .iter()
        .map(|entry| batch_log_likelihood(&entry.theta, &entry.batch, basis))
        .collect()
}

/// `p(v | θ)` for every visible configuration, in canonical order.
pub fn learned_distribution(theta: &Theta, basis: SpinBasis) -> Result<Vec<f64>> {
    let log_z = log_partition(theta, basis)?;
    all_configurations_in(theta.n_visible(), basis)?
        .iter()
        .map(|v| log_prob_visible(v, theta, log_z).map(f64::exp))
        .collect()
}

/// Learned distribution at the end of every epoch that has at least one
/// step, paired with the epoch index.
pub fn epoch_distributions(
    history: &TrainingHistory,
    config: &RunConfig,
) -> Result<Vec<(usize, Vec<f64>)>> {
    let mut out = Vec::new();
    for epoch in 0..config.n_epochs() {
        let Some(end) = config.epoch_end_index(epoch) else {
            continue;
        };
        let entry = history.get(end).ok_or(RbmError::IndexOutOfRange {
            index: end,
            len: history.len(),
        })?;
        out.push((epoch, learned_distribution(&entry.theta, history.basis())?));
    }
    Ok(out)
}

/// `F(v) = -ln Σ_h exp(-E(v, h))` over the supplied hidden configurations.
pub fn free_energy(v: &SpinVector, theta: &Theta, all_h: &[SpinVector]) -> Result<f64> {
    if all_h.is_empty() {
        return Err(RbmError::EmptyConfigurationSet);
    }
    let acc = all_h
        .iter()
        .map(|h| energy(v, h, theta).map(|e| -e))
        .collect::<Result<LogSumExp>>()?;
    Ok(-acc.value())
}

/// `KL(target || learned) = Σ p ln(p / q)`; terms with `p = 0` contribute
/// nothing.
pub fn kl_divergence(target: &[f64], learned: &[f64]) -> Result<f64> {
    if target.len() != learned.len() {
        return Err(RbmError::ShapeMismatch {
            what: "learned distribution",
            expected: target.len(),
            actual: learned.len(),
        });
    }
    Ok(target
        .iter()
        .zip(learned)
        .filter(|(p, _)| **p > 0.0)
        .map(|(p, q)| p * (p.ln() - q.ln()))
        .sum())
}
