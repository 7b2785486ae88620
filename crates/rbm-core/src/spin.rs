//! Spin bases and basis-tagged spin vectors.
//!
//! Binary units can be encoded either as `{0, 1}` or as Ising spins
//! `{-1, +1}`. The enumerator emits vectors in the `{0, 1}` basis while the
//! energy model is usually trained with Ising spins, so every vector carries
//! its basis and converting between the two is always an explicit call to
//! [`SpinVector::to_basis`].
//!
//! ```
//! use rbm_core::spin::{SpinBasis, SpinVector};
//!
//! let bits = SpinVector::new(SpinBasis::Binary, vec![1, 0, 1]).unwrap();
//! let spins = bits.to_basis(SpinBasis::Ising);
//! assert_eq!(spins.values(), &[1, -1, 1]);
//! ```

use crate::error::{RbmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding convention for a binary unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinBasis {
    /// Units take values in `{0, 1}`.
    Binary,
    /// Units take values in `{-1, +1}`.
    Ising,
}

impl SpinBasis {
    /// Value of a unit that is "off".
    #[inline]
    pub const fn low(self) -> i8 {
        match self {
            SpinBasis::Binary => 0,
            SpinBasis::Ising => -1,
        }
    }

    /// Value of a unit that is "on".
    #[inline]
    pub const fn high(self) -> i8 {
        1
    }

    /// `high - low`: the factor multiplying a unit's local field in its
    /// activation probability.
    #[inline]
    pub const fn gain(self) -> f64 {
        match self {
            SpinBasis::Binary => 1.0,
            SpinBasis::Ising => 2.0,
        }
    }

    /// Whether `value` is a member of this basis.
    #[inline]
    pub fn contains(self, value: i8) -> bool {
        value == self.low() || value == self.high()
    }

    /// Map a single unit value from `self` into `target`.
    ///
    /// The caller guarantees `value` is a member of `self`.
    #[inline]
    fn map_value(self, value: i8, target: SpinBasis) -> i8 {
        if value == self.high() {
            target.high()
        } else {
            target.low()
        }
    }
}

impl fmt::Display for SpinBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinBasis::Binary => write!(f, "{{0,1}}"),
            SpinBasis::Ising => write!(f, "{{-1,+1}}"),
        }
    }
}

impl std::str::FromStr for SpinBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "01" => Ok(SpinBasis::Binary),
            "ising" | "pm1" => Ok(SpinBasis::Ising),
            other => Err(format!("unknown spin basis '{other}' (expected 'binary' or 'ising')")),
        }
    }
}

/// A fixed-length vector of binary units tagged with its basis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpinVectorRepr")]
pub struct SpinVector {
    basis: SpinBasis,
    values: Vec<i8>,
}

// Deserialization goes through `SpinVector::new` so archived vectors are
// re-validated.
#[derive(Deserialize)]
struct SpinVectorRepr {
    basis: SpinBasis,
    values: Vec<i8>,
}

impl TryFrom<SpinVectorRepr> for SpinVector {
    type Error = RbmError;

    fn try_from(repr: SpinVectorRepr) -> Result<Self> {
        SpinVector::new(repr.basis, repr.values)
    }
}

impl SpinVector {
    /// Create a vector, checking every entry belongs to `basis`.
    pub fn new(basis: SpinBasis, values: Vec<i8>) -> Result<Self> {
        if let Some(&bad) = values.iter().find(|&&v| !basis.contains(v)) {
            return Err(RbmError::InvalidSpin {
                value: bad as i64,
                basis,
            });
        }
        Ok(SpinVector { basis, values })
    }

    /// Build a vector from on/off flags.
    pub fn from_bits(basis: SpinBasis, bits: &[bool]) -> Self {
        let values = bits
            .iter()
            .map(|&on| if on { basis.high() } else { basis.low() })
            .collect();
        SpinVector { basis, values }
    }

    /// The empty vector (the single configuration of a zero-unit layer).
    pub fn empty(basis: SpinBasis) -> Self {
        SpinVector {
            basis,
            values: Vec::new(),
        }
    }

    pub fn basis(&self) -> SpinBasis {
        self.basis
    }

    pub fn values(&self) -> &[i8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entry `j` as a float, for use in energy sums.
    #[inline]
    pub fn get(&self, j: usize) -> f64 {
        self.values[j] as f64
    }

    /// Iterate entries as floats.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|&v| v as f64)
    }

    /// Whether unit `j` is in its "on" state.
    #[inline]
    pub fn is_on(&self, j: usize) -> bool {
        self.values[j] == self.basis.high()
    }

    /// Explicit conversion into another basis. Converting into the same basis
    /// returns a copy.
    pub fn to_basis(&self, target: SpinBasis) -> SpinVector {
        if target == self.basis {
            return self.clone();
        }
        let values = self
            .values
            .iter()
            .map(|&v| self.basis.map_value(v, target))
            .collect();
        SpinVector {
            basis: target,
            values,
        }
    }

    /// Fail with [`RbmError::BasisMismatch`] unless this vector uses `expected`.
    pub fn require_basis(&self, expected: SpinBasis) -> Result<&Self> {
        if self.basis != expected {
            return Err(RbmError::BasisMismatch {
                expected,
                found: self.basis,
            });
        }
        Ok(self)
    }

    /// Fail with [`RbmError::ShapeMismatch`] unless this vector has `expected` entries.
    pub fn require_len(&self, what: &'static str, expected: usize) -> Result<&Self> {
        if self.len() != expected {
            return Err(RbmError::ShapeMismatch {
                what,
                expected,
                actual: self.len(),
            });
        }
        Ok(self)
    }
}

impl fmt::Display for SpinVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, v) in self.values.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v:+}")?;
        }
        write!(f, "]")
    }
}
