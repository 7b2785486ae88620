//! Target distributions to learn.

use rbm_core::{all_configurations, DataDistribution, RbmError, Result, SpinVector};
use rbm_samplers::LogSumExp;

/// Chain Hamiltonian `H(v) = -Σᵢ sᵢ₋₁sᵢ / T` with periodic boundary, where
/// `sᵢ = 2vᵢ - 1` and index `-1` wraps to the last unit.
pub fn chain_hamiltonian(v: &SpinVector, temperature: f64) -> f64 {
    let m = v.len();
    let spin = |j: usize| if v.is_on(j) { 1.0 } else { -1.0 };
    -(0..m)
        .map(|i| spin((i + m - 1) % m) * spin(i))
        .sum::<f64>()
        / temperature
}

/// Boltzmann distribution of the periodic chain over all `2^m` `{0, 1}`
/// configurations, in canonical order.
pub fn periodic_chain_distribution(m: usize, temperature: f64) -> Result<DataDistribution> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(RbmError::InvalidTemperature(temperature));
    }
    let configs = all_configurations(m)?;
    let log_weights: Vec<f64> = configs
        .iter()
        .map(|v| -chain_hamiltonian(v, temperature))
        .collect();
    let log_norm = log_weights.iter().copied().collect::<LogSumExp>().value();
    let probabilities = log_weights.iter().map(|w| (w - log_norm).exp()).collect();
    DataDistribution::new(configs, probabilities)
}
