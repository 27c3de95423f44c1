//! Loop splitting (fission at a sequence point).
//!
//! Split inserts a new sequence boundary immediately after an addressed
//! point: every statement that textually follows the point within the loop
//! at the given depth has its scattering constant at that depth incremented.
//!
//! Example:
//! ```text
//! for i:              for i:
//!   S0    [0,0]         S0      [0,0]
//!   S1    [0,1]       for i:            (after split([0,0], 1))
//!                       S1      [1,1]
//! ```

use crate::scattering::StatementId;
use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use log::debug;

/// Loop splitting transformation.
#[derive(Debug, Clone)]
pub struct Split {
    /// The statement ID of the split point.
    pub point: StatementId,
    /// 1-based loop depth at which the sequence is cut.
    pub depth: usize,
}

impl Split {
    /// Split the sequence at `depth` immediately after `point`.
    pub fn new(point: Vec<i64>, depth: usize) -> Self {
        Self {
            point: StatementId::new(point),
            depth,
        }
    }

    fn shift_following(&self, scop: &mut Scop) -> TransformResult<()> {
        if self.depth == 0 {
            return Err(TransformError::DepthOutOfRange {
                depth: 0,
                n_output: 0,
            });
        }
        let dim = 2 * (self.depth - 1);
        for statement in &mut scop.statements {
            let id = statement.scattering.statement_id()?;
            let (diff, pos) = self.point.compare(&id);
            // Statements lexicographically after the point, differing at or
            // below the split depth. Matrices too shallow for the scattering
            // dimension are skipped, not rejected.
            if diff < 0 && pos + 1 >= self.depth && dim < statement.scattering.n_output_dims() {
                statement.scattering.shift_id_value(self.depth - 1, 1)?;
            }
        }
        Ok(())
    }
}

impl Transform for Split {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!("split(point={}, depth={})", self.point, self.depth);
        self.shift_following(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "split"
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
    fn test_split_after_point() {
        let mut scop = scop_with_ids(&[&[0, 1], &[0, 2]]);
        Split::new(vec![0, 1], 1).apply(&mut scop).unwrap();
        assert_eq!(ids(&scop), vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn test_split_leaves_preceding_statements() {
        let mut scop = scop_with_ids(&[&[0, 0], &[0, 1], &[0, 2]]);
        Split::new(vec![0, 1], 2).apply(&mut scop).unwrap();
        assert_eq!(ids(&scop), vec![vec![0, 0], vec![0, 1], vec![0, 3]]);
    }

    #[test]
    fn test_split_shifts_whole_following_subtree() {
        let mut scop = scop_with_ids(&[&[0, 0], &[0, 1], &[1]]);
        Split::new(vec![0, 0], 1).apply(&mut scop).unwrap();
        assert_eq!(ids(&scop), vec![vec![0, 0], vec![1, 1], vec![2]]);
    }

    #[test]
    fn test_split_depth_zero_fails() {
        let mut scop = scop_with_ids(&[&[0]]);
        assert!(Split::new(vec![0], 0).apply(&mut scop).is_err());
    }
}
