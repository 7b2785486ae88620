//! # rbm-samplers
//!
//! Stochastic machinery for training RBMs with contrastive divergence:
//!
//! - [`RngKey`]: splittable seeds for reproducible runs
//! - [`UniformSource`]: the only randomness samplers consume, with a seeded
//!   [`RngSource`] and a replayable [`FixedUniforms`] for tests
//! - [`bernoulli`]: stable `softplus`/`sigmoid`, log-sum-exp and unit draws
//! - [`ConditionalModel`]: what a model must expose to be Gibbs sampled
//! - [`cd`]: CD-k chains and batch generation
//!
//! ```rust
//! use rbm_samplers::{RngKey, RngSource, UniformSource};
//!
//! let (train_key, init_key) = RngKey::new(42).split_two();
//! let mut source = RngSource::from_key(train_key);
//! assert!((0.0..1.0).contains(&source.uniform()));
//! # let _ = init_key;
//! ```

pub mod bernoulli;
pub mod cd;
pub mod rng;
pub mod sampler;
pub mod source;

pub use bernoulli::{bernoulli_spin, log_sum_exp, log_sum_exp_slice, sigmoid, softplus, LogSumExp};
pub use cd::{cdk, generate_batch, sample_hidden, sample_visible, CdSample};
pub use rng::RngKey;
pub use sampler::ConditionalModel;
pub use source::{FixedUniforms, RngSource, UniformSource};
