//! Numerically stable logistic functions and Bernoulli unit sampling.
//!
//! Everything here stays in log space until the last step: `softplus` and
//! log-sum-exp never overflow for finite inputs, and `sigmoid` is built on
//! `softplus`, so activation probabilities are always finite and inside
//! `[0, 1]`.

use crate::source::UniformSource;
use rbm_core::SpinBasis;

/// `ln(1 + e^x)` without overflow.
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Logistic function `1 / (1 + e^-x)`, computed as `exp(-softplus(-x))`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    (-softplus(-x)).exp()
}

/// `ln(e^a + e^b)`.
#[inline]
pub fn log_sum_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if hi == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    hi + (lo - hi).exp().ln_1p()
}

/// `ln Σ e^xᵢ` over a slice; `-inf` for an empty slice.
pub fn log_sum_exp_slice(xs: &[f64]) -> f64 {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = xs.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

/// Streaming log-sum-exp accumulator.
///
/// Keeps a running maximum and a sum of `exp(x - max)`, rescaling when a new
/// maximum arrives. The result depends only on the order of pushes.
#[derive(Debug, Clone, Copy)]
pub struct LogSumExp {
    max: f64,
    scaled_sum: f64,
}

impl Default for LogSumExp {
    fn default() -> Self {
        LogSumExp {
            max: f64::NEG_INFINITY,
            scaled_sum: 0.0,
        }
    }
}

impl LogSumExp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        if x == f64::NEG_INFINITY {
            return;
        }
        if x <= self.max {
            self.scaled_sum += (x - self.max).exp();
        } else {
            self.scaled_sum = self.scaled_sum * (self.max - x).exp() + 1.0;
            self.max = x;
        }
    }

    pub fn value(&self) -> f64 {
        if self.max == f64::NEG_INFINITY {
            f64::NEG_INFINITY
        } else {
            self.max + self.scaled_sum.ln()
        }
    }
}

impl FromIterator<f64> for LogSumExp {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = LogSumExp::new();
        for x in iter {
            acc.push(x);
        }
        acc
    }
}

/// Draw one unit: `basis.high()` iff `u < p_on`, else `basis.low()`.
///
/// Consumes exactly one uniform.
#[inline]
pub fn bernoulli_spin<S: UniformSource + ?Sized>(p_on: f64, basis: SpinBasis, source: &mut S) -> i8 {
    if source.uniform() < p_on {
        basis.high()
    } else {
        basis.low()
    }
}
