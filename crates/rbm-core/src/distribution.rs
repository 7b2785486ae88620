//! Empirical target distribution over visible configurations.

use crate::error::{RbmError, Result};
use crate::spin::{SpinBasis, SpinVector};
use serde::{Deserialize, Serialize};

/// Tolerance on `Σ p = 1` accepted by [`DataDistribution::new`].
pub const NORMALISATION_TOLERANCE: f64 = 1e-9;

/// A finite set of visible vectors with probabilities summing to one.
///
/// All vectors share one length and one basis. CD chains are seeded by
/// weighted draws from this set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DataDistributionRepr")]
pub struct DataDistribution {
    vectors: Vec<SpinVector>,
    probabilities: Vec<f64>,
}

#[derive(Deserialize)]
struct DataDistributionRepr {
    vectors: Vec<SpinVector>,
    probabilities: Vec<f64>,
}

impl TryFrom<DataDistributionRepr> for DataDistribution {
    type Error = RbmError;

    fn try_from(repr: DataDistributionRepr) -> Result<Self> {
        DataDistribution::new(repr.vectors, repr.probabilities)
    }
}

impl DataDistribution {
    pub fn new(vectors: Vec<SpinVector>, probabilities: Vec<f64>) -> Result<Self> {
        if vectors.is_empty() {
            return Err(RbmError::InvalidDistribution(
                "distribution has no configurations".into(),
            ));
        }
        if vectors.len() != probabilities.len() {
            return Err(RbmError::InvalidDistribution(format!(
                "{} configurations but {} probabilities",
                vectors.len(),
                probabilities.len()
            )));
        }

        let len = vectors[0].len();
        let basis = vectors[0].basis();
        for (idx, v) in vectors.iter().enumerate() {
            if v.len() != len {
                return Err(RbmError::InvalidDistribution(format!(
                    "configuration {idx} has length {} (expected {len})",
                    v.len()
                )));
            }
            if v.basis() != basis {
                return Err(RbmError::InvalidDistribution(format!(
                    "configuration {idx} is in basis {} (expected {basis})",
                    v.basis()
                )));
            }
        }

        if let Some((idx, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(RbmError::InvalidDistribution(format!(
                "probability {idx} is {p}"
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > NORMALISATION_TOLERANCE {
            return Err(RbmError::InvalidDistribution(format!(
                "probabilities sum to {total}"
            )));
        }

        Ok(DataDistribution {
            vectors,
            probabilities,
        })
    }

    pub fn vectors(&self) -> &[SpinVector] {
        &self.vectors
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Length of every vector in the set.
    pub fn vector_len(&self) -> usize {
        self.vectors[0].len()
    }

    pub fn basis(&self) -> SpinBasis {
        self.vectors[0].basis()
    }

    /// Inverse-CDF choice of a configuration index from `u ∈ [0, 1)`.
    ///
    /// Zero-probability entries are never selected. Rounding in the cumulative
    /// sum can leave `u` above the final bucket; that falls back to the last
    /// entry with positive mass.
    pub fn sample_index(&self, u: f64) -> usize {
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (idx, &p) in self.probabilities.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_positive = idx;
            if u < cumulative {
                return idx;
            }
        }
        last_positive
    }

    /// The configuration chosen by [`sample_index`](Self::sample_index).
    pub fn sample(&self, u: f64) -> &SpinVector {
        &self.vectors[self.sample_index(u)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::all_configurations;

    fn two_unit(probabilities: Vec<f64>) -> Result<DataDistribution> {
        DataDistribution::new(all_configurations(2)?, probabilities)
    }

    #[test]
    fn test_validation() {
        assert!(two_unit(vec![0.25; 4]).is_ok());
        assert!(two_unit(vec![0.25; 3]).is_err());
        assert!(two_unit(vec![0.5, 0.5, 0.5, -0.5]).is_err());
        assert!(two_unit(vec![0.3; 4]).is_err());
        assert!(two_unit(vec![f64::NAN, 0.5, 0.25, 0.25]).is_err());
        assert!(DataDistribution::new(vec![], vec![]).is_err());

        let mixed = vec![
            SpinVector::from_bits(SpinBasis::Binary, &[true]),
            SpinVector::from_bits(SpinBasis::Ising, &[true]),
        ];
        assert!(DataDistribution::new(mixed, vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn test_sample_index_inverse_cdf() {
        let dist = two_unit(vec![0.1, 0.0, 0.6, 0.3]).unwrap();
        assert_eq!(dist.sample_index(0.0), 0);
        assert_eq!(dist.sample_index(0.09), 0);
        assert_eq!(dist.sample_index(0.1), 2);
        assert_eq!(dist.sample_index(0.69), 2);
        assert_eq!(dist.sample_index(0.7), 3);
        assert_eq!(dist.sample_index(0.999_999), 3);
        // Past the accumulated mass: last positive entry.
        assert_eq!(dist.sample_index(1.0), 3);
    }

    #[test]
    fn test_deserialize_revalidates() {
        let dist = two_unit(vec![0.5, 0.25, 0.125, 0.125]).unwrap();
        let text = serde_json::to_string(&dist).unwrap();
        assert_eq!(serde_json::from_str::<DataDistribution>(&text).unwrap(), dist);

        let unnormalised = text.replace("0.5", "0.75");
        assert!(serde_json::from_str::<DataDistribution>(&unnormalised).is_err());
    }

    #[test]
    fn test_zero_mass_tail_never_selected() {
        let dist = two_unit(vec![0.5, 0.5, 0.0, 0.0]).unwrap();
        assert_eq!(dist.sample_index(0.999_999_999), 1);
        assert_eq!(dist.sample(0.75).values(), &[0, 1]);
    }
}
