//! Statement identifiers: lexicographic positions in the loop-nest tree.
//!
//! Every even output dimension of a scattering matrix is fixed by exactly one
//! row to a constant. Reading those constants off in order yields the
//! statement's *ID*, e.g. `[0, 1, 2]`: first top-level branch 0, then branch
//! 1 at the second level, then branch 2 at the third. A *loop identifier* is
//! a statement-ID prefix addressing an internal node of that tree; it is the
//! universal statement-selection predicate for every transformation.

use crate::scattering::ScatteringMatrix;
use crate::utils::errors::ScopError;
use num_traits::ToPrimitive;
use std::fmt;

/// The ordered sequence of scattering-dimension constants identifying a
/// statement's position in the loop-nest tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementId(Vec<i64>);

impl StatementId {
    /// Wrap a raw position vector.
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// The position components, outermost first.
    pub fn values(&self) -> &[i64] {
        &self.0
    }

    /// Number of levels this ID addresses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ID has no levels at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The component at `level`, if the ID is that deep.
    pub fn get(&self, level: usize) -> Option<i64> {
        self.0.get(level).copied()
    }

    /// Lexicographically compare two IDs over their common length.
    ///
    /// Returns the signed difference at the first position where they differ
    /// (saturating at the `i64` bounds, so only the sign is meaningful),
    /// together with that position. If no difference exists in the common
    /// length, returns `(0, common_length)`; lengths beyond the common prefix
    /// do not count as a difference.
    pub fn compare(&self, other: &StatementId) -> (i64, usize) {
        compare_ids(&self.0, other.0.as_slice())
    }

    /// Whether `loop_id` governs this statement, i.e. whether the comparison
    /// reports no difference within `loop_id`'s length.
    pub fn in_loop(&self, loop_id: &[i64]) -> bool {
        compare_ids(loop_id, &self.0).0 == 0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

fn compare_ids(a: &[i64], b: &[i64]) -> (i64, usize) {
    let len = a.len().min(b.len());
    for i in 0..len {
        if a[i] != b[i] {
            return (a[i].saturating_sub(b[i]), i);
        }
    }
    (0, len)
}

impl ScatteringMatrix {
    /// Extract the statement ID from the even output dimensions.
    ///
    /// For each even output dimension, finds the unique row whose coefficient
    /// there is nonzero and reads that row's constant. Fails with
    /// [`ScopError::MissingIdRow`] when no row defines a dimension — a
    /// well-formed scattering matrix never triggers this.
    pub fn statement_id(&self) -> Result<StatementId, ScopError> {
        let mut values = Vec::with_capacity(self.n_output_dims() / 2 + 1);
        for dim in (0..self.n_output_dims()).step_by(2) {
            let row = self
                .find_output_row(dim)
                .ok_or(ScopError::MissingIdRow { dim })?;
            let value = self
                .constant(row)
                .to_i64()
                .ok_or(ScopError::IdOutOfRange { dim })?;
            values.push(value);
        }
        Ok(StatementId(values))
    }

    /// Overwrite the scattering-dimension constant at `level` with `value`.
    pub fn set_id_value(&mut self, level: usize, value: i64) -> Result<(), ScopError> {
        let dim = 2 * level;
        let row = self
            .find_output_row(dim)
            .ok_or(ScopError::MissingIdRow { dim })?;
        self.set_constant(row, value);
        Ok(())
    }

    /// Add `delta` to the scattering-dimension constant at `level`.
    pub fn shift_id_value(&mut self, level: usize, delta: i64) -> Result<(), ScopError> {
        let dim = 2 * level;
        let row = self
            .find_output_row(dim)
            .ok_or(ScopError::MissingIdRow { dim })?;
        self.add_to_constant(row, delta);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(values: &[i64]) -> StatementId {
        StatementId::new(values.to_vec())
    }

    #[test]
    fn test_statement_id_roundtrip() {
        let m = ScatteringMatrix::from_position(&[0, 1, 2], 0);
        assert_eq!(m.statement_id().unwrap(), id(&[0, 1, 2]));
    }

    #[test]
    fn test_statement_id_missing_row() {
        let m = ScatteringMatrix::new(3, 1, 0);
        assert!(matches!(
            m.statement_id(),
            Err(ScopError::MissingIdRow { dim: 0 })
        ));
    }

    #[test]
    fn test_compare_equal_prefix() {
        assert_eq!(id(&[0, 1]).compare(&id(&[0, 1, 2])), (0, 2));
        assert_eq!(id(&[0, 1, 2]).compare(&id(&[0, 1])), (0, 2));
    }

    #[test]
    fn test_compare_difference() {
        assert_eq!(id(&[0, 1]).compare(&id(&[0, 3])), (-2, 1));
        assert_eq!(id(&[2, 0]).compare(&id(&[1, 9])), (1, 0));
    }

    #[test]
    fn test_compare_extreme_values_keeps_sign() {
        // Differences near the i64 bounds saturate instead of overflowing.
        assert_eq!(id(&[i64::MAX]).compare(&id(&[i64::MIN])), (i64::MAX, 0));
        assert_eq!(id(&[i64::MIN]).compare(&id(&[i64::MAX])), (i64::MIN, 0));
    }

    #[test]
    fn test_in_loop_prefix() {
        assert!(id(&[0, 1, 2]).in_loop(&[0]));
        assert!(id(&[0, 1, 2]).in_loop(&[0, 1]));
        assert!(!id(&[0, 2, 2]).in_loop(&[0, 1]));
        // The empty loop identifier is the SCoP root.
        assert!(id(&[5]).in_loop(&[]));
    }

    #[test]
    fn test_set_and_shift_id_value() {
        let mut m = ScatteringMatrix::from_position(&[0, 1], 0);
        m.set_id_value(0, 4).unwrap();
        m.shift_id_value(1, 2).unwrap();
        assert_eq!(m.statement_id().unwrap(), id(&[4, 3]));
    }
}
