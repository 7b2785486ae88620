//! Exhaustive enumeration of binary configurations.
//!
//! Exact partition functions and marginals sum over every configuration of a
//! layer, so the enumerator defines the canonical index order that all
//! per-configuration probability arrays share: binary counting with the most
//! significant unit first, zero padded to the layer size.
//!
//! ```
//! use rbm_core::enumerate::all_configurations;
//!
//! let configs = all_configurations(2).unwrap();
//! let rows: Vec<&[i8]> = configs.iter().map(|v| v.values()).collect();
//! assert_eq!(rows, vec![&[0, 0][..], &[0, 1], &[1, 0], &[1, 1]]);
//! ```

use crate::error::{RbmError, Result};
use crate::spin::{SpinBasis, SpinVector};

/// Largest layer the enumerator will expand (2^24 vectors).
pub const MAX_ENUMERATED_UNITS: usize = 24;

/// Largest visible + hidden total for which an exact double sum is attempted.
pub const MAX_JOINT_UNITS: usize = 30;

/// Validate a signed unit count coming from an untyped source.
pub fn unit_count(n: i64) -> Result<usize> {
    if n < 0 {
        return Err(RbmError::NegativeUnitCount(n));
    }
    let n = n as usize;
    check_enumerable(n)?;
    Ok(n)
}

/// Fail unless a layer of `n_units` can be enumerated.
pub fn check_enumerable(n_units: usize) -> Result<()> {
    if n_units > MAX_ENUMERATED_UNITS {
        return Err(RbmError::TooManyUnits {
            n_units,
            max: MAX_ENUMERATED_UNITS,
        });
    }
    Ok(())
}

/// Fail unless an exact sum over `n_visible + n_hidden` units is tractable.
pub fn check_joint_enumerable(n_visible: usize, n_hidden: usize) -> Result<()> {
    check_enumerable(n_visible)?;
    check_enumerable(n_hidden)?;
    let joint = n_visible + n_hidden;
    if joint > MAX_JOINT_UNITS {
        return Err(RbmError::TooManyUnits {
            n_units: joint,
            max: MAX_JOINT_UNITS,
        });
    }
    Ok(())
}

/// Configuration number `index` of an `n_units` layer, in the `{0, 1}` basis.
pub fn configuration(index: usize, n_units: usize) -> SpinVector {
    let bits: Vec<bool> = (0..n_units)
        .map(|unit| {
            let bit_pos = n_units - 1 - unit;
            (index >> bit_pos) & 1 == 1
        })
        .collect();
    SpinVector::from_bits(SpinBasis::Binary, &bits)
}

/// All `2^n_units` configurations in canonical order, `{0, 1}` basis.
///
/// `n_units == 0` yields a single empty configuration.
pub fn all_configurations(n_units: usize) -> Result<Vec<SpinVector>> {
    check_enumerable(n_units)?;
    let n_configs = 1usize << n_units;
    Ok((0..n_configs)
        .map(|index| configuration(index, n_units))
        .collect())
}

/// All configurations, explicitly converted into `basis`.
pub fn all_configurations_in(n_units: usize, basis: SpinBasis) -> Result<Vec<SpinVector>> {
    Ok(all_configurations(n_units)?
        .into_iter()
        .map(|v| v.to_basis(basis))
        .collect())
}

/// Position of `v` in the canonical order (inverse of [`configuration`]).
pub fn configuration_index(v: &SpinVector) -> usize {
    (0..v.len()).fold(0usize, |acc, j| (acc << 1) | usize::from(v.is_on(j)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_zero_units_single_configuration() {
        let configs = all_configurations(0).unwrap();
        assert_eq!(configs.len(), 1);
        assert!(configs[0].is_empty());
        assert_eq!(configuration_index(&configs[0]), 0);
    }

    #[test]
    fn test_counts_and_uniqueness() {
        for n in 0..=8 {
            let configs = all_configurations(n).unwrap();
            assert_eq!(configs.len(), 1 << n, "n = {}", n);
            assert!(configs.iter().all(|v| v.len() == n));

            let unique: HashSet<&[i8]> = configs.iter().map(|v| v.values()).collect();
            assert_eq!(unique.len(), configs.len(), "duplicates for n = {}", n);
        }
    }

    #[test]
    fn test_order_is_stable_and_canonical() {
        let first = all_configurations(5).unwrap();
        let second = all_configurations(5).unwrap();
        assert_eq!(first, second);

        for (index, v) in first.iter().enumerate() {
            assert_eq!(configuration_index(v), index);
        }
        assert_eq!(first[6].values(), &[0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_basis_conversion_is_explicit() {
        let spins = all_configurations_in(2, SpinBasis::Ising).unwrap();
        assert_eq!(spins[0].values(), &[-1, -1]);
        assert_eq!(spins[3].values(), &[1, 1]);
        assert!(spins.iter().all(|v| v.basis() == SpinBasis::Ising));
        assert_eq!(configuration_index(&spins[2]), 2);
    }

    #[test]
    fn test_size_guards() {
        assert_eq!(unit_count(-1), Err(RbmError::NegativeUnitCount(-1)));
        assert_eq!(unit_count(3), Ok(3));
        assert!(matches!(
            all_configurations(MAX_ENUMERATED_UNITS + 1),
            Err(RbmError::TooManyUnits { .. })
        ));
        assert!(check_joint_enumerable(20, 10).is_ok());
        assert!(matches!(
            check_joint_enumerable(20, 11),
            Err(RbmError::TooManyUnits { n_units: 31, .. })
        ));
    }
}
