//! Paired model/data samples consumed by one gradient step.

use crate::error::{RbmError, Result};
use crate::spin::SpinVector;
use serde::{Deserialize, Serialize};

/// `B` model samples (chain end points) and the `B` data samples that
/// seeded them, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BatchRepr")]
pub struct Batch {
    model_samples: Vec<SpinVector>,
    data_samples: Vec<SpinVector>,
}

#[derive(Deserialize)]
struct BatchRepr {
    model_samples: Vec<SpinVector>,
    data_samples: Vec<SpinVector>,
}

impl TryFrom<BatchRepr> for Batch {
    type Error = RbmError;

    fn try_from(repr: BatchRepr) -> Result<Self> {
        Batch::new(repr.model_samples, repr.data_samples)
    }
}

impl Batch {
    pub fn new(model_samples: Vec<SpinVector>, data_samples: Vec<SpinVector>) -> Result<Self> {
        if model_samples.len() != data_samples.len() {
            return Err(RbmError::ShapeMismatch {
                what: "batch data samples",
                expected: model_samples.len(),
                actual: data_samples.len(),
            });
        }
        Ok(Batch {
            model_samples,
            data_samples,
        })
    }

    pub fn model_samples(&self) -> &[SpinVector] {
        &self.model_samples
    }

    pub fn data_samples(&self) -> &[SpinVector] {
        &self.data_samples
    }

    pub fn len(&self) -> usize {
        self.model_samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model_samples.is_empty()
    }

    /// `(model, data)` pairs in sample order.
    pub fn pairs(&self) -> impl Iterator<Item = (&SpinVector, &SpinVector)> {
        self.model_samples.iter().zip(self.data_samples.iter())
    }
}
