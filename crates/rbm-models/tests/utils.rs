//! Shared helpers for the rbm-models integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rbm_core::Theta;

/// Parameters drawn uniformly on `(-scale, scale)` from a seeded generator.
pub fn random_theta(n_visible: usize, n_hidden: usize, scale: f64, seed: u64) -> Theta {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let theta = Theta::random_uniform(n_visible, n_hidden, || rng.gen::<f64>());
    Theta {
        weights: theta.weights * scale,
        visible_bias: theta.visible_bias * scale,
        hidden_bias: theta.hidden_bias * scale,
    }
}

pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{}: got {}, expected {} (tol {})",
        what,
        actual,
        expected,
        tol
    );
}
