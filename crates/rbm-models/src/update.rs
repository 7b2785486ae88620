//! Gradient-ascent parameter update.

use crate::gradient::ThetaGradient;
use rbm_core::{RbmError, Result, Theta};

/// `θ + α·Δθ`, component-wise. The input is left untouched.
pub fn apply_gradient(theta: &Theta, gradient: &ThetaGradient, alpha: f64) -> Result<Theta> {
    if !alpha.is_finite() {
        return Err(RbmError::InvalidLearningRate(alpha));
    }
    if gradient.weights.dim() != theta.weights.dim()
        || gradient.n_visible() != theta.n_visible()
        || gradient.n_hidden() != theta.n_hidden()
    {
        let (expected, actual) = if gradient.n_visible() != theta.n_visible() {
            (theta.n_visible(), gradient.n_visible())
        } else {
            (theta.n_hidden(), gradient.n_hidden())
        };
        return Err(RbmError::ShapeMismatch {
            what: "gradient",
            expected,
            actual,
        });
    }

    let mut next = theta.clone();
    next.weights.scaled_add(alpha, &gradient.weights);
    next.visible_bias.scaled_add(alpha, &gradient.visible_bias);
    next.hidden_bias.scaled_add(alpha, &gradient.hidden_bias);
    Ok(next)
}
