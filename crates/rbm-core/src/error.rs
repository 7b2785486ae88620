//! Error type shared by the learning-engine crates.

use crate::spin::SpinBasis;

/// Precondition violations raised by the RBM engine.
///
/// Every variant describes an input the engine refuses to coerce. Numerical
/// overflow is not represented here: the probability code is written in
/// log space so it cannot produce NaN/Inf for finite inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RbmError {
    /// A unit count was negative.
    #[error("unit count must be non-negative, got {0}")]
    NegativeUnitCount(i64),

    /// Exhaustive enumeration would exceed the configured ceiling.
    #[error("refusing to enumerate 2^{n_units} configurations (limit is 2^{max})")]
    TooManyUnits { n_units: usize, max: usize },

    /// Array or vector shapes do not conform.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Two spin vectors (or a vector and a model) use different bases.
    #[error("spin basis mismatch: expected {expected}, found {found}")]
    BasisMismatch { expected: SpinBasis, found: SpinBasis },

    /// A spin entry is not a member of its declared basis.
    #[error("value {value} is not a valid spin in the {basis} basis")]
    InvalidSpin { value: i64, basis: SpinBasis },

    /// A unit index was outside the layer.
    #[error("unit index {index} out of range for layer of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A batch (or sample set) had no entries.
    #[error("batch is empty")]
    EmptyBatch,

    /// A configuration set passed to an exact sum was empty.
    #[error("configuration set is empty")]
    EmptyConfigurationSet,

    /// Contrastive divergence was asked to run zero Gibbs rounds.
    #[error("contrastive divergence depth must be at least 1")]
    ZeroCdDepth,

    /// The training schedule contains no steps at all.
    #[error("training schedule has zero total steps")]
    ZeroTotalSteps,

    /// Per-epoch schedule lists differ in length.
    #[error(
        "per-epoch schedule lists differ in length: steps={steps}, learning_rates={learning_rates}, cd_depths={cd_depths}"
    )]
    ScheduleLengthMismatch {
        steps: usize,
        learning_rates: usize,
        cd_depths: usize,
    },

    /// Learning rate was NaN or infinite.
    #[error("learning rate must be finite, got {0}")]
    InvalidLearningRate(f64),

    /// A reference distribution failed validation.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// A partition function value that cannot normalise anything.
    #[error("partition function must be positive and finite, got {0}")]
    InvalidPartition(f64),

    /// Temperature must be positive and finite.
    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),
}

/// Result alias used across the engine crates.
pub type Result<T> = std::result::Result<T, RbmError>;
