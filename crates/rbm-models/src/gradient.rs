//! CD-k estimate of the log-likelihood gradient.

use crate::energy::{expected_hidden_vector, spin_array, IsingRbm};
use ndarray::{Array1, Array2};
use rbm_core::{Batch, RbmError, Result, SpinVector, Theta};
use rbm_samplers::ConditionalModel;
use serde::{Deserialize, Serialize};

/// Ascent direction `Δθ` with the same shapes as [`Theta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaGradient {
    pub weights: Array2<f64>,
    pub visible_bias: Array1<f64>,
    pub hidden_bias: Array1<f64>,
}

impl ThetaGradient {
    pub fn zeros(n_visible: usize, n_hidden: usize) -> Self {
        ThetaGradient {
            weights: Array2::zeros((n_hidden, n_visible)),
            visible_bias: Array1::zeros(n_visible),
            hidden_bias: Array1::zeros(n_hidden),
        }
    }

    pub fn n_visible(&self) -> usize {
        self.visible_bias.len()
    }

    pub fn n_hidden(&self) -> usize {
        self.hidden_bias.len()
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.weights
            .iter()
            .chain(self.visible_bias.iter())
            .chain(self.hidden_bias.iter())
            .fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    fn accumulate(&mut self, sign: f64, v: &Array1<f64>, expected_h: &Array1<f64>) {
        for ((i, j), w) in self.weights.indexed_iter_mut() {
            *w += sign * expected_h[i] * v[j];
        }
        self.visible_bias.scaled_add(sign, v);
        self.hidden_bias.scaled_add(sign, expected_h);
    }
}

fn check_sample(rbm: &IsingRbm<'_>, v: &SpinVector) -> Result<()> {
    v.require_basis(rbm.basis())?
        .require_len("batch sample", rbm.n_visible())?;
    Ok(())
}

/// Batch-mean CD gradient.
///
/// For each `(model, data)` pair in `batch`:
///
/// ```text
/// ΔWᵢⱼ += E[hᵢ|v_d]·v_d[j] - E[hᵢ|v_m]·v_m[j]
/// Δbⱼ  += v_d[j] - v_m[j]
/// Δcᵢ  += E[hᵢ|v_d] - E[hᵢ|v_m]
/// ```
///
/// then every component is divided by the batch size.
pub fn estimate_gradient(rbm: &IsingRbm<'_>, batch: &Batch) -> Result<ThetaGradient> {
    if batch.is_empty() {
        return Err(RbmError::EmptyBatch);
    }
    let theta: &Theta = rbm.theta();
    let mut gradient = ThetaGradient::zeros(theta.n_visible(), theta.n_hidden());

    for (model_v, data_v) in batch.pairs() {
        check_sample(rbm, model_v)?;
        check_sample(rbm, data_v)?;

        let data_h = expected_hidden_vector(data_v, theta)?;
        let model_h = expected_hidden_vector(model_v, theta)?;
        gradient.accumulate(1.0, &spin_array(data_v), &data_h);
        gradient.accumulate(-1.0, &spin_array(model_v), &model_h);
    }

    let scale = 1.0 / batch.len() as f64;
    gradient.weights *= scale;
    gradient.visible_bias *= scale;
    gradient.hidden_bias *= scale;
    Ok(gradient)
}
