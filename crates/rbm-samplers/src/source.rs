//! Uniform random sources.
//!
//! Samplers only ever need `u ~ U[0, 1)`, so they take a [`UniformSource`]
//! rather than a concrete generator. Production code wraps a seeded ChaCha8
//! stream; tests replay a fixed sequence to make a step fully predictable.

use crate::rng::RngKey;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A stream of uniform draws on `[0, 1)`.
pub trait UniformSource {
    fn uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// Uniform source backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R = ChaCha8Rng> {
    rng: R,
}

impl RngSource<ChaCha8Rng> {
    pub fn from_key(key: RngKey) -> Self {
        RngSource { rng: key.rng() }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::from_key(RngKey::new(seed))
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of uniforms, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedUniforms {
    values: Vec<f64>,
    draws: usize,
}

impl FixedUniforms {
    /// # Panics
    ///
    /// If `values` is empty or contains anything outside `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "FixedUniforms needs at least one value");
        assert!(
            values.iter().all(|u| (0.0..1.0).contains(u)),
            "FixedUniforms values must lie in [0, 1)"
        );
        FixedUniforms { values, draws: 0 }
    }

    /// A source that always returns `u`.
    pub fn constant(u: f64) -> Self {
        Self::new(vec![u])
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl UniformSource for FixedUniforms {
    fn uniform(&mut self) -> f64 {
        let u = self.values[self.draws % self.values.len()];
        self.draws += 1;
        u
    }
}
