//! Sibling reordering.
//!
//! Reorder permutes the statements (or loops) directly under one loop: each
//! statement's scattering constant at the loop's depth is overwritten with
//! `new_order[old_value]`.
//!
//! Example:
//! ```text
//! for i:                       for i:
//!   S0   [0,0]                   S1   [0,0]
//!   S1   [0,1]                   S2   [0,1]   (after reorder([0], [2,0,1]))
//!   S2   [0,2]                   S0   [0,2]
//! ```

use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use log::debug;

/// Sibling reordering transformation.
#[derive(Debug, Clone)]
pub struct Reorder {
    /// The loop whose children are permuted; empty means the SCoP root.
    pub loop_id: Vec<i64>,
    /// Permutation indexed by old sibling value.
    pub new_order: Vec<i64>,
}

impl Reorder {
    /// Permute the children of `loop_id` according to `new_order`.
    pub fn new(loop_id: Vec<i64>, new_order: Vec<i64>) -> Self {
        Self { loop_id, new_order }
    }

    fn permute(&self, scop: &mut Scop) -> TransformResult<()> {
        let level = self.loop_id.len();
        for statement in &mut scop.statements {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(&self.loop_id) {
                continue;
            }
            let old = id
                .get(level)
                .ok_or(TransformError::DepthOutOfRange {
                    depth: level + 1,
                    n_output: statement.scattering.n_output_dims(),
                })?;
            let new = usize::try_from(old)
                .ok()
                .and_then(|i| self.new_order.get(i).copied())
                .ok_or(TransformError::BadPermutation {
                    value: old,
                    len: self.new_order.len(),
                })?;
            statement.scattering.set_id_value(level, new)?;
        }
        Ok(())
    }
}

impl Transform for Reorder {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!("reorder(loop={:?}, order={:?})", self.loop_id, self.new_order);
        self.permute(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "reorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scattering::ScatteringMatrix;
    use crate::scop::Statement;

    fn scop_with_ids(ids: &[&[i64]]) -> Scop {
        let mut scop = Scop::new("test");
        for (k, id) in ids.iter().enumerate() {
            scop.statements.push(Statement::new(
                format!("S{k}"),
                ScatteringMatrix::from_position(id, 0),
            ));
        }
        scop
    }

    fn ids(scop: &Scop) -> Vec<Vec<i64>> {
        scop.statement_ids()
            .unwrap()
            .into_iter()
            .map(|id| id.values().to_vec())
            .collect()
    }

    #[test]
    fn test_reorder_three_siblings() {
        let mut scop = scop_with_ids(&[&[0, 0], &[0, 1], &[0, 2]]);
        Reorder::new(vec![0], vec![2, 0, 1]).apply(&mut scop).unwrap();
        assert_eq!(ids(&scop), vec![vec![0, 2], vec![0, 0], vec![0, 1]]);
    }

    #[test]
    fn test_reorder_root_level() {
        let mut scop = scop_with_ids(&[&[0, 0], &[1]]);
        Reorder::new(vec![], vec![1, 0]).apply(&mut scop).unwrap();
        assert_eq!(ids(&scop), vec![vec![1, 0], vec![0]]);
    }

    #[test]
    fn test_reorder_only_touches_addressed_depth() {
        let mut scop = scop_with_ids(&[&[0, 0, 1], &[0, 1, 0], &[1, 0]]);
        Reorder::new(vec![0], vec![1, 0]).apply(&mut scop).unwrap();
        // Values above and below the reordered depth are unchanged; the
        // sibling subtree [1] is untouched.
        assert_eq!(
            ids(&scop),
            vec![vec![0, 1, 1], vec![0, 0, 0], vec![1, 0]]
        );
    }

    #[test]
    fn test_reorder_value_outside_permutation() {
        let mut scop = scop_with_ids(&[&[0, 4]]);
        let err = Reorder::new(vec![0], vec![1, 0])
            .apply(&mut scop)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<TransformError>(),
            Some(&TransformError::BadPermutation { value: 4, len: 2 })
        );
    }
}
