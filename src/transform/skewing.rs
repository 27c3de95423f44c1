//! Loop skewing transformation.
//!
//! Skewing realizes the affine substitution
//! `iterator(depth_other) += coeff * iterator(depth)` across the whole
//! scattering matrix: for every row, `coeff` times the coefficient at the
//! source iterator column is added into the target iterator column. Every
//! row is rewritten regardless of kind, since any constraint touching the
//! source iterator must be carried along for the substitution to stay
//! consistent.
//!
//! Skewing a loop by itself is a caller-level precondition violation and is
//! not checked here.

use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use log::debug;
use num_bigint::BigInt;

/// Loop skewing transformation.
#[derive(Debug, Clone)]
pub struct Skew {
    /// The loop whose statements are rewritten.
    pub loop_id: Vec<i64>,
    /// 1-based depth of the source iterator.
    pub depth: usize,
    /// 1-based depth of the iterator being skewed.
    pub depth_other: usize,
    /// Skew coefficient.
    pub coeff: i64,
}

impl Skew {
    /// Skew the loop at `depth_other` by `coeff` times the loop at `depth`.
    pub fn new(loop_id: Vec<i64>, depth: usize, depth_other: usize, coeff: i64) -> Self {
        Self {
            loop_id,
            depth,
            depth_other,
            coeff,
        }
    }

    fn add_scaled_column(&self, scop: &mut Scop) -> TransformResult<()> {
        if self.depth == 0 || self.depth_other == 0 {
            return Err(TransformError::DepthOutOfRange {
                depth: 0,
                n_output: 0,
            });
        }
        let src = 2 * self.depth - 1;
        let dst = 2 * self.depth_other - 1;
        for statement in &mut scop.statements {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(&self.loop_id) {
                continue;
            }
            let m = &mut statement.scattering;
            let n_output = m.n_output_dims();
            if src >= n_output || dst >= n_output {
                return Err(TransformError::DepthOutOfRange {
                    depth: self.depth.max(self.depth_other),
                    n_output,
                });
            }
            for row in 0..m.n_rows() {
                let scaled: BigInt = m.out_coeff(row, src).clone() * self.coeff;
                let sum = m.out_coeff(row, dst).clone() + scaled;
                m.set_out_coeff(row, dst, sum);
            }
        }
        Ok(())
    }
}

impl Transform for Skew {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!(
            "skew(loop={:?}, depth={}, depth_other={}, coeff={})",
            self.loop_id, self.depth, self.depth_other, self.coeff
        );
        self.add_scaled_column(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "skew"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scattering::{RowKind, ScatterRow, ScatteringMatrix};
    use crate::scop::Statement;
    use num_bigint::BigInt;

    fn two_deep_scop() -> Scop {
        let mut scop = Scop::new("test");
        let mut m = ScatteringMatrix::from_position(&[0, 0, 0], 0);
        // An extra inequality referencing the depth-1 iterator, as a domain
        // bound projected into the scattering would.
        m.push_row(ScatterRow::zeros(RowKind::Inequality, m.width()));
        let last = m.n_rows() - 1;
        m.set_out_coeff(last, 1, 3);
        m.set_constant(last, 10);
        scop.statements.push(Statement::new("S0", m));
        scop
    }

    #[test]
    fn test_skew_rewrites_every_row() {
        let mut scop = two_deep_scop();
        Skew::new(vec![0], 1, 2, 2).apply(&mut scop).unwrap();
        let m = &scop.statements[0].scattering;
        // The depth-1 iterator equality row picked up 2x its coefficient in
        // the depth-2 column.
        let row = m.find_output_row(1).unwrap();
        assert_eq!(*m.out_coeff(row, 3), BigInt::from(-2));
        // The trailing inequality was rewritten too.
        let last = m.n_rows() - 1;
        assert_eq!(*m.out_coeff(last, 3), BigInt::from(6));
    }

    #[test]
    fn test_skew_inverse_restores_matrix() {
        let mut scop = two_deep_scop();
        let original = scop.clone();
        Skew::new(vec![0], 1, 2, 3).apply(&mut scop).unwrap();
        assert_ne!(scop, original);
        Skew::new(vec![0], 1, 2, -3).apply(&mut scop).unwrap();
        assert_eq!(scop, original);
    }

    #[test]
    fn test_skew_skips_other_subtrees() {
        let mut scop = two_deep_scop();
        scop.statements.push(Statement::new(
            "S1",
            ScatteringMatrix::from_position(&[1, 0, 0], 0),
        ));
        let untouched = scop.statements[1].clone();
        Skew::new(vec![0], 1, 2, 5).apply(&mut scop).unwrap();
        assert_eq!(scop.statements[1], untouched);
    }

    #[test]
    fn test_skew_depth_out_of_range() {
        let mut scop = two_deep_scop();
        let err = Skew::new(vec![0], 1, 9, 1).apply(&mut scop).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransformError>(),
            Some(TransformError::DepthOutOfRange { .. })
        ));
    }
}
