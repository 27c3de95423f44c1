//! Strip-mining (tiling) transformation.
//!
//! Strip-mining introduces one new blocking loop level immediately enclosing
//! the loop at the given depth: the original iterator `i` is re-expressed in
//! terms of a block index `b` and an intra-block offset, with
//! `size * b <= i <= size * b + (size - 1)`.
//!
//! Per matching statement, two output columns are inserted right after the
//! depth's scattering dimension (a block-iterator column and a new
//! scattering-dimension column) and three rows are inserted at the position
//! of the scattering-dimension row:
//! - an equality fixing the new scattering dimension (`-1` coefficient) to
//!   the sequence constant migrated off the superseded row;
//! - the lower-bound inequality `i - size * b >= 0`;
//! - the upper-bound inequality `size * b - i + (size - 1) >= 0`.
//!
//! The superseded row's constant is zeroed. The name list then grows by two
//! synthesized, collision-free names spliced in at the insertion position.
//!
//! ```text
//! for i:                    for b:                       (block loop)
//!   S0                        for i in [4b, 4b+3]:       (after tile size 4)
//!                               S0
//! ```

use crate::scattering::{RowKind, ScatterRow, ScatteringMatrix};
use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{ScopError, TransformError, TransformResult};
use anyhow::Result;
use log::debug;
use num_bigint::BigInt;

/// Strip-mining transformation.
#[derive(Debug, Clone)]
pub struct StripMine {
    /// The loop whose statements are rewritten.
    pub loop_id: Vec<i64>,
    /// 1-based depth of the loop being blocked.
    pub depth: usize,
    /// Tile size; at least 1.
    pub size: i64,
}

impl StripMine {
    /// Block the loop at `depth` under `loop_id` with tile `size`.
    pub fn new(loop_id: Vec<i64>, depth: usize, size: i64) -> Self {
        Self {
            loop_id,
            depth,
            size,
        }
    }

    fn block(&self, scop: &mut Scop) -> TransformResult<()> {
        if self.size < 1 {
            return Err(TransformError::InvalidTileSize(self.size));
        }
        if self.depth == 0 {
            return Err(TransformError::DepthOutOfRange {
                depth: 0,
                n_output: 0,
            });
        }
        let dim = 2 * (self.depth - 1);
        // Validate every matching statement before mutating any, so a depth
        // error cannot leave some matrices grown and the name list short.
        let mut matching = Vec::new();
        for (index, statement) in scop.statements.iter().enumerate() {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(&self.loop_id) {
                continue;
            }
            let m = &statement.scattering;
            if dim >= m.n_output_dims() || self.depth > m.n_input_dims() {
                return Err(TransformError::DepthOutOfRange {
                    depth: self.depth,
                    n_output: m.n_output_dims(),
                });
            }
            if m.find_output_row(dim).is_none() {
                return Err(ScopError::MissingIdRow { dim }.into());
            }
            matching.push(index);
        }
        for index in matching {
            self.block_statement(&mut scop.statements[index].scattering, dim)?;
        }

        // The name rewrite is a single global step after the statement loop.
        // It runs even when no statement matched; callers pre-validate the
        // loop identifier with `Scop::is_loop` to avoid desynchronizing the
        // list in that case.
        let at = dim + 1;
        let old = scop.scatter_names.get(at).unwrap_or("t").to_string();
        let block_name = scop.scatter_names.fresh("__b");
        let iter_name = scop.scatter_names.fresh(&format!("__{old}{old}"));
        scop.scatter_names.insert_pair(at, iter_name, block_name);
        Ok(())
    }

    /// Insert the blocking columns and rows into one scattering matrix.
    fn block_statement(&self, m: &mut ScatteringMatrix, dim: usize) -> TransformResult<()> {
        if dim >= m.n_output_dims() || self.depth > m.n_input_dims() {
            return Err(TransformError::DepthOutOfRange {
                depth: self.depth,
                n_output: m.n_output_dims(),
            });
        }
        let row = m
            .find_output_row(dim)
            .ok_or(ScopError::MissingIdRow { dim })?;
        let migrated = m.constant(row).clone();

        // New output dims: block iterator at dim+1, scattering dim at dim+2.
        m.insert_output_columns(dim + 1, 2);
        let block_dim = dim + 1;
        let scat_dim = dim + 2;
        let iter_in = self.depth - 1;

        let width = m.width();
        m.insert_rows(
            row,
            vec![
                ScatterRow::zeros(RowKind::Equality, width),
                ScatterRow::zeros(RowKind::Inequality, width),
                ScatterRow::zeros(RowKind::Inequality, width),
            ],
        );

        // Equality fixing the new scattering dimension to the migrated
        // sequence constant.
        m.set_out_coeff(row, scat_dim, -1);
        m.set_constant(row, migrated);
        // Lower bound: i - size * b >= 0.
        m.set_out_coeff(row + 1, block_dim, -self.size);
        m.set_in_coeff(row + 1, iter_in, 1);
        // Upper bound: size * b - i + (size - 1) >= 0.
        m.set_out_coeff(row + 2, block_dim, self.size);
        m.set_in_coeff(row + 2, iter_in, -1);
        m.set_constant(row + 2, self.size - 1);
        // The superseded row keeps its -1 coefficient but loses its constant.
        m.set_constant(row + 3, BigInt::from(0));
        Ok(())
    }
}

impl Transform for StripMine {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!(
            "stripmine(loop={:?}, depth={}, size={})",
            self.loop_id, self.depth, self.size
        );
        self.block(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stripmine"
    }
}
