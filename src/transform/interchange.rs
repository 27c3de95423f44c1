//! Loop interchange transformation.
//!
//! Interchange swaps the iterator-dimension columns of two loop depths
//! across every row of each matching statement's scattering matrix. Swapping
//! every row, not just the defining equalities, keeps every constraint that
//! references the two iterators consistent.
//!
//! Example:
//! ```text
//! for i:                for j:
//!   for j:                for i:       (after interchange([0], 1, 2))
//!     A[i][j] = ...         A[i][j] = ...
//! ```

use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use log::debug;

/// Loop interchange transformation.
#[derive(Debug, Clone)]
pub struct Interchange {
    /// The loop whose statements are rewritten.
    pub loop_id: Vec<i64>,
    /// First 1-based depth to swap.
    pub depth1: usize,
    /// Second 1-based depth to swap.
    pub depth2: usize,
    /// Also swap the two scattering dimension names, so generated code keeps
    /// meaningful loop-variable names. When false, names go stale relative to
    /// the new nesting order and the caller is responsible for them.
    pub pretty: bool,
}

impl Interchange {
    /// Swap loop depths `depth1` and `depth2` under `loop_id`.
    pub fn new(loop_id: Vec<i64>, depth1: usize, depth2: usize, pretty: bool) -> Self {
        Self {
            loop_id,
            depth1,
            depth2,
            pretty,
        }
    }

    fn swap_columns(&self, scop: &mut Scop) -> TransformResult<()> {
        let dim1 = iterator_dim(self.depth1)?;
        let dim2 = iterator_dim(self.depth2)?;
        for statement in &mut scop.statements {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(&self.loop_id) {
                continue;
            }
            let n_output = statement.scattering.n_output_dims();
            if dim1 >= n_output || dim2 >= n_output {
                return Err(TransformError::DepthOutOfRange {
                    depth: self.depth1.max(self.depth2),
                    n_output,
                });
            }
            statement.scattering.swap_output_columns(dim1, dim2);
        }
        if self.pretty {
            scop.scatter_names.swap(dim1, dim2)?;
        }
        Ok(())
    }
}

/// The output-dimension index of the iterator at a 1-based depth.
fn iterator_dim(depth: usize) -> TransformResult<usize> {
    if depth == 0 {
        return Err(TransformError::DepthOutOfRange {
            depth: 0,
            n_output: 0,
        });
    }
    Ok(2 * depth - 1)
}

impl Transform for Interchange {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!(
            "interchange(loop={:?}, depths={}<->{}, pretty={})",
            self.loop_id, self.depth1, self.depth2, self.pretty
        );
        if self.depth1 == self.depth2 {
            return Ok(());
        }
        self.swap_columns(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "interchange"
    }
}
