//! Normalisation self-test.
//!
//! Draws random parameter sets over a range of layer sizes and checks that
//! `Σ_v p(v | θ)` is one. The outcome is a report; a failing configuration is
//! data for the caller, not an error.

use crate::energy::{log_partition_function, log_prob_visible};
use rbm_core::{all_configurations_in, Result, SpinBasis, Theta};
use rbm_samplers::UniformSource;
use std::time::{Duration, Instant};

/// A `(m, n)` draw whose total probability missed one.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisationIssue {
    pub n_visible: usize,
    pub n_hidden: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalisationReport {
    pub all_normalised: bool,
    pub issues: Vec<NormalisationIssue>,
    /// Number of parameter sets checked.
    pub checked: usize,
    pub elapsed: Duration,
}

/// `Σ_v p(v | θ)`, with `ln Z` from the explicit double sum.
pub fn check_normalisation(theta: &Theta, basis: SpinBasis) -> Result<f64> {
    let all_v = all_configurations_in(theta.n_visible(), basis)?;
    let all_h = all_configurations_in(theta.n_hidden(), basis)?;
    let log_z = log_partition_function(&all_v, &all_h, theta)?;
    all_v
        .iter()
        .map(|v| log_prob_visible(v, theta, log_z).map(f64::exp))
        .sum()
}

/// Check `checks_per_config` random parameter sets for every
/// `1 ≤ m ≤ max_visible`, `1 ≤ n ≤ max_hidden`.
///
/// Parameters are drawn uniformly on `(-1, 1)` from `source`.
pub fn check_normalisation_many<S>(
    max_visible: usize,
    max_hidden: usize,
    checks_per_config: usize,
    tolerance: f64,
    basis: SpinBasis,
    source: &mut S,
) -> Result<NormalisationReport>
where
    S: UniformSource + ?Sized,
{
    let start = Instant::now();
    let mut issues = Vec::new();
    let mut checked = 0;

    for _ in 0..checks_per_config {
        for m in 1..=max_visible {
            for n in 1..=max_hidden {
                let theta = Theta::random_uniform(m, n, || source.uniform());
                let total = check_normalisation(&theta, basis)?;
                checked += 1;
                if (total - 1.0).abs() > tolerance {
                    tracing::warn!(m, n, total, "normalisation check failed");
                    issues.push(NormalisationIssue {
                        n_visible: m,
                        n_hidden: n,
                        total,
                    });
                }
            }
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(checked, failures = issues.len(), ?elapsed, "normalisation self-test done");

    Ok(NormalisationReport {
        all_normalised: issues.is_empty(),
        issues,
        checked,
        elapsed,
    })
}
