//! Energy function and exact probabilities of the RBM.
//!
//! ```text
//! E(v, h) = -(bᵀv + cᵀh + hᵀWv)
//! ```
//!
//! Unit values are taken from whatever basis the vectors carry. In the
//! `{0, 1}` basis the conditionals reduce to the textbook `σ(Σⱼ Wᵢⱼvⱼ + cᵢ)`;
//! with Ising spins the local field is scaled by the basis gain (2), which is
//! the exact conditional for `±1` units. Either way `Σ_v p(v|θ) = 1`.
//!
//! All probabilities are assembled in log space from `softplus` and
//! log-sum-exp, so they stay finite for any finite parameters.

use itertools::Itertools;
use ndarray::Array1;
use rbm_core::enumerate::check_joint_enumerable;
use rbm_core::{all_configurations_in, RbmError, Result, SpinBasis, SpinVector, Theta};
use rbm_samplers::{log_sum_exp, sigmoid, ConditionalModel, LogSumExp};

/// Entries of `v` as a float array.
pub fn spin_array(v: &SpinVector) -> Array1<f64> {
    v.iter_f64().collect()
}

fn require_visible(v: &SpinVector, theta: &Theta) -> Result<()> {
    v.require_len("visible vector", theta.n_visible())?;
    Ok(())
}

fn require_hidden(h: &SpinVector, theta: &Theta) -> Result<()> {
    h.require_len("hidden vector", theta.n_hidden())?;
    Ok(())
}

/// `E(v, h) = -(bᵀv + cᵀh + hᵀWv)`.
pub fn energy(v: &SpinVector, h: &SpinVector, theta: &Theta) -> Result<f64> {
    require_visible(v, theta)?;
    require_hidden(h, theta)?;
    h.require_basis(v.basis())?;

    let v = spin_array(v);
    let h = spin_array(h);
    let interaction = h.dot(&theta.weights.dot(&v));
    Ok(-(theta.visible_bias.dot(&v) + theta.hidden_bias.dot(&h) + interaction))
}

/// Local field of hidden unit `i`: `Σⱼ Wᵢⱼvⱼ + cᵢ`.
pub fn hidden_field(i: usize, v: &SpinVector, theta: &Theta) -> Result<f64> {
    require_visible(v, theta)?;
    if i >= theta.n_hidden() {
        return Err(RbmError::IndexOutOfRange {
            index: i,
            len: theta.n_hidden(),
        });
    }
    let row = theta.weights.row(i);
    let field: f64 = row.iter().zip(v.iter_f64()).map(|(w, x)| w * x).sum();
    Ok(field + theta.hidden_bias[i])
}

/// Local field of visible unit `j`: `Σᵢ Wᵢⱼhᵢ + bⱼ`.
pub fn visible_field(j: usize, h: &SpinVector, theta: &Theta) -> Result<f64> {
    require_hidden(h, theta)?;
    if j >= theta.n_visible() {
        return Err(RbmError::IndexOutOfRange {
            index: j,
            len: theta.n_visible(),
        });
    }
    let column = theta.weights.column(j);
    let field: f64 = column.iter().zip(h.iter_f64()).map(|(w, x)| w * x).sum();
    Ok(field + theta.visible_bias[j])
}

/// `P(hᵢ = on | v, θ)`.
pub fn conditional_hidden_active(i: usize, v: &SpinVector, theta: &Theta) -> Result<f64> {
    let field = hidden_field(i, v, theta)?;
    Ok(sigmoid(v.basis().gain() * field))
}

/// `P(vⱼ = on | h, θ)`.
pub fn conditional_visible_active(j: usize, h: &SpinVector, theta: &Theta) -> Result<f64> {
    let field = visible_field(j, h, theta)?;
    Ok(sigmoid(h.basis().gain() * field))
}

/// `E[hᵢ | v, θ]` in the basis of `v`.
///
/// Equals `P(hᵢ = 1 | v)` for `{0, 1}` units.
pub fn expected_hidden(i: usize, v: &SpinVector, theta: &Theta) -> Result<f64> {
    let basis = v.basis();
    let p = conditional_hidden_active(i, v, theta)?;
    Ok(basis.low() as f64 + basis.gain() * p)
}

/// `E[h | v, θ]` for every hidden unit.
pub fn expected_hidden_vector(v: &SpinVector, theta: &Theta) -> Result<Array1<f64>> {
    (0..theta.n_hidden())
        .map(|i| expected_hidden(i, v, theta))
        .collect()
}

fn check_configuration_sets(all_v: &[SpinVector], all_h: &[SpinVector]) -> Result<()> {
    if all_v.is_empty() || all_h.is_empty() {
        return Err(RbmError::EmptyConfigurationSet);
    }
    Ok(())
}

/// `ln Z` by an exact double sum over the supplied configurations, streamed
/// through log-sum-exp in `(v, h)` order.
pub fn log_partition_function(
    all_v: &[SpinVector],
    all_h: &[SpinVector],
    theta: &Theta,
) -> Result<f64> {
    check_configuration_sets(all_v, all_h)?;
    all_v
        .iter()
        .cartesian_product(all_h)
        .map(|(v, h)| energy(v, h, theta).map(|e| -e))
        .collect::<Result<LogSumExp>>()
        .map(|acc| acc.value())
}

/// `Z = Σ_v Σ_h exp(-E(v, h))`.
pub fn partition_function(all_v: &[SpinVector], all_h: &[SpinVector], theta: &Theta) -> Result<f64> {
    Ok(log_partition_function(all_v, all_h, theta)?.exp())
}

/// `ln Σ_h exp(-E(v, h))`, the hidden layer summed out in closed form:
///
/// ```text
/// bᵀv + Σᵢ ln(exp(low·xᵢ) + exp(high·xᵢ)),   xᵢ = cᵢ + Σⱼ Wᵢⱼvⱼ
/// ```
pub fn log_unnormalised_marginal(v: &SpinVector, theta: &Theta) -> Result<f64> {
    require_visible(v, theta)?;
    let basis = v.basis();
    let low = basis.low() as f64;
    let high = basis.high() as f64;

    let v_arr = spin_array(v);
    let fields = theta.weights.dot(&v_arr) + &theta.hidden_bias;
    let hidden_terms: f64 = fields
        .iter()
        .map(|&x| log_sum_exp(low * x, high * x))
        .sum();
    Ok(theta.visible_bias.dot(&v_arr) + hidden_terms)
}

/// `ln Z` for a model whose units live in `basis`, summing the hidden layer
/// out analytically and enumerating visible configurations.
///
/// Agrees with [`log_partition_function`] over the full enumerations.
pub fn log_partition(theta: &Theta, basis: SpinBasis) -> Result<f64> {
    check_joint_enumerable(theta.n_visible(), theta.n_hidden())?;
    let all_v = all_configurations_in(theta.n_visible(), basis)?;
    all_v
        .iter()
        .map(|v| log_unnormalised_marginal(v, theta))
        .collect::<Result<LogSumExp>>()
        .map(|acc| acc.value())
}

/// `ln p(v | θ)` given `ln Z`.
///
/// `log_z` must come from enumerations in the basis of `v`; a partition
/// function from the other basis yields a silently wrong value. Use
/// [`prob_visible_in_basis`] to have it computed and checked.
pub fn log_prob_visible(v: &SpinVector, theta: &Theta, log_z: f64) -> Result<f64> {
    if !log_z.is_finite() {
        return Err(RbmError::InvalidPartition(log_z.exp()));
    }
    Ok(log_unnormalised_marginal(v, theta)? - log_z)
}

/// `p(v | θ) = Σ_h exp(-E(v, h)) / Z`.
///
/// `z` is trusted to belong to the basis of `v`.
pub fn prob_visible_given_theta(v: &SpinVector, theta: &Theta, z: f64) -> Result<f64> {
    if !(z.is_finite() && z > 0.0) {
        return Err(RbmError::InvalidPartition(z));
    }
    Ok(log_prob_visible(v, theta, z.ln())?.exp())
}

/// `p(v | θ)` with `Z` enumerated in `basis`, rejecting `v` from any other basis.
pub fn prob_visible_in_basis(v: &SpinVector, theta: &Theta, basis: SpinBasis) -> Result<f64> {
    v.require_basis(basis)?;
    require_visible(v, theta)?;
    let log_z = log_partition(theta, basis)?;
    Ok(log_prob_visible(v, theta, log_z)?.exp())
}

/// Borrowed view of a parameter set in a fixed basis, for sampling.
#[derive(Debug, Clone, Copy)]
pub struct IsingRbm<'a> {
    theta: &'a Theta,
    basis: SpinBasis,
}

impl<'a> IsingRbm<'a> {
    pub fn new(theta: &'a Theta, basis: SpinBasis) -> Self {
        IsingRbm { theta, basis }
    }

    pub fn theta(&self) -> &'a Theta {
        self.theta
    }
}

impl ConditionalModel for IsingRbm<'_> {
    fn basis(&self) -> SpinBasis {
        self.basis
    }

    fn n_visible(&self) -> usize {
        self.theta.n_visible()
    }

    fn n_hidden(&self) -> usize {
        self.theta.n_hidden()
    }

    fn hidden_activation(&self, i: usize, v: &SpinVector) -> Result<f64> {
        v.require_basis(self.basis)?;
        conditional_hidden_active(i, v, self.theta)
    }

    fn visible_activation(&self, j: usize, h: &SpinVector) -> Result<f64> {
        h.require_basis(self.basis)?;
        conditional_visible_active(j, h, self.theta)
    }
}
