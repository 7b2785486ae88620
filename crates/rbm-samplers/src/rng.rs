//! Functional-style RNG keys.
//!
//! A key is a `u64` seed; splitting it with ChaCha8 yields independent child
//! keys, so every component of a run can own its own stream while the whole
//! run stays reproducible from one seed.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// An RNG key for deterministic random number generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngKey(pub u64);

impl RngKey {
    pub fn new(seed: u64) -> Self {
        RngKey(seed)
    }

    /// Split this key into `n` independent keys.
    pub fn split(self, n: usize) -> Vec<RngKey> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![self];
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        (0..n).map(|_| RngKey(rng.next_u64())).collect()
    }

    /// Split into exactly two keys.
    pub fn split_two(self) -> (RngKey, RngKey) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        (RngKey(rng.next_u64()), RngKey(rng.next_u64()))
    }

    pub fn seed(&self) -> u64 {
        self.0
    }

    /// A generator seeded from this key.
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}
