//! # rbm-models
//!
//! A restricted Boltzmann machine learned with contrastive divergence, with
//! every probability computed exactly by enumeration:
//!
//! - [`energy`]: energy, conditionals, partition function, `p(v | θ)`, and the
//!   [`IsingRbm`] view the CD sampler runs on
//! - [`gradient`]: batch CD-k gradient estimate
//! - [`update`]: `θ + α·Δθ`
//! - [`training`]: the epoch/step driver and its append-only history
//! - [`reference`]: the periodic-chain target distribution
//! - [`diagnostics`]: log-likelihood traces, learned distributions, KL
//! - [`selftest`]: normalisation checks over random parameters
//!
//! ```rust
//! use rbm_core::{RunConfig, SpinBasis};
//! use rbm_models::{periodic_chain_distribution, train};
//! use rbm_samplers::RngSource;
//!
//! let data = periodic_chain_distribution(3, 1.0).unwrap();
//! let config = RunConfig::from_lists(&[2], &[0.5], &[1], 3, 2, 4).unwrap();
//! let mut source = RngSource::from_seed(1);
//! let run = train(&config, &data, SpinBasis::Ising, &mut source).unwrap();
//! assert_eq!(run.history.len(), 2);
//! ```

pub mod diagnostics;
pub mod energy;
pub mod gradient;
pub mod reference;
pub mod selftest;
pub mod training;
pub mod update;

pub use diagnostics::{
    batch_log_likelihood, epoch_distributions, free_energy, kl_divergence, learned_distribution,
    log_likelihood, log_likelihood_trace,
};
pub use energy::{
    conditional_hidden_active, conditional_visible_active, energy, expected_hidden,
    log_partition, log_partition_function, log_prob_visible, partition_function,
    prob_visible_given_theta, prob_visible_in_basis, IsingRbm,
};
pub use gradient::{estimate_gradient, ThetaGradient};
pub use reference::periodic_chain_distribution;
pub use selftest::{check_normalisation, check_normalisation_many, NormalisationIssue, NormalisationReport};
pub use training::{cd_step, train, train_from, HistoryEntry, StepOutcome, TrainingHistory, TrainingRun};
pub use update::apply_gradient;
