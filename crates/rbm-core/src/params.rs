//! RBM parameter set.

use crate::error::{RbmError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Parameters `θ = (W, b, c)` of a restricted Boltzmann machine.
///
/// `weights` has shape `[n_hidden, n_visible]` so that `weights[[i, j]]`
/// couples hidden unit `i` with visible unit `j`. `visible_bias` has length
/// `n_visible` and `hidden_bias` has length `n_hidden`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThetaRepr")]
pub struct Theta {
    pub weights: Array2<f64>,
    pub visible_bias: Array1<f64>,
    pub hidden_bias: Array1<f64>,
}

// Archived parameters are re-checked through `Theta::new`.
#[derive(Deserialize)]
struct ThetaRepr {
    weights: Array2<f64>,
    visible_bias: Array1<f64>,
    hidden_bias: Array1<f64>,
}

impl TryFrom<ThetaRepr> for Theta {
    type Error = RbmError;

    fn try_from(repr: ThetaRepr) -> Result<Self> {
        Theta::new(repr.weights, repr.visible_bias, repr.hidden_bias)
    }
}

impl Theta {
    /// Assemble a parameter set, checking that the three arrays conform.
    pub fn new(
        weights: Array2<f64>,
        visible_bias: Array1<f64>,
        hidden_bias: Array1<f64>,
    ) -> Result<Self> {
        let (n_hidden, n_visible) = weights.dim();
        if visible_bias.len() != n_visible {
            return Err(RbmError::ShapeMismatch {
                what: "visible bias",
                expected: n_visible,
                actual: visible_bias.len(),
            });
        }
        if hidden_bias.len() != n_hidden {
            return Err(RbmError::ShapeMismatch {
                what: "hidden bias",
                expected: n_hidden,
                actual: hidden_bias.len(),
            });
        }
        Ok(Theta {
            weights,
            visible_bias,
            hidden_bias,
        })
    }

    /// All-zero parameters.
    pub fn zeros(n_visible: usize, n_hidden: usize) -> Self {
        Theta {
            weights: Array2::zeros((n_hidden, n_visible)),
            visible_bias: Array1::zeros(n_visible),
            hidden_bias: Array1::zeros(n_hidden),
        }
    }

    /// Every entry i.i.d. uniform on `(-1, 1)`.
    ///
    /// `uniform` must return values in `[0, 1)`. Entries are drawn in the
    /// order `W` (row-major), `b`, `c`, so a fixed uniform stream always
    /// yields the same parameters.
    pub fn random_uniform<F>(n_visible: usize, n_hidden: usize, mut uniform: F) -> Self
    where
        F: FnMut() -> f64,
    {
        let mut draw = move || 2.0 * uniform() - 1.0;
        let weights = Array2::from_shape_simple_fn((n_hidden, n_visible), &mut draw);
        let visible_bias = Array1::from_shape_simple_fn(n_visible, &mut draw);
        let hidden_bias = Array1::from_shape_simple_fn(n_hidden, &mut draw);
        Theta {
            weights,
            visible_bias,
            hidden_bias,
        }
    }

    pub fn n_visible(&self) -> usize {
        self.visible_bias.len()
    }

    pub fn n_hidden(&self) -> usize {
        self.hidden_bias.len()
    }

    /// Fail unless `other` has the same layer sizes.
    pub fn require_same_shape(&self, other: &Theta) -> Result<()> {
        if other.n_visible() != self.n_visible() {
            return Err(RbmError::ShapeMismatch {
                what: "visible layer",
                expected: self.n_visible(),
                actual: other.n_visible(),
            });
        }
        if other.n_hidden() != self.n_hidden() {
            return Err(RbmError::ShapeMismatch {
                what: "hidden layer",
                expected: self.n_hidden(),
                actual: other.n_hidden(),
            });
        }
        Ok(())
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.weights.iter().all(|x| x.is_finite())
            && self.visible_bias.iter().all(|x| x.is_finite())
            && self.hidden_bias.iter().all(|x| x.is_finite())
    }
}
