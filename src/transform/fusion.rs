//! Loop fusion transformation.
//!
//! Fuse merges the loop immediately following the addressed loop at the same
//! nesting level into it: statements of the next sibling loop are re-tagged
//! as belonging to the target, and their sequence values are shifted past
//! the target's existing children so no two statement IDs collide.
//!
//! Example:
//! ```text
//! for i:  S0 [0,0]                 for i:  S0 [0,0]
//!         S1 [0,1]                         S1 [0,1]
//! for i:  S2 [1,0]                         S2 [0,2]   (after fuse([0]))
//!         S3 [1,1]                         S3 [0,3]
//! ```
//!
//! Both precondition checks (the identifier addresses a loop, and a next
//! sibling loop exists) run before any mutation.

use crate::scop::Scop;
use crate::transform::Transform;
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use log::debug;

/// Loop fusion transformation.
#[derive(Debug, Clone)]
pub struct Fuse {
    /// The loop that absorbs its next sibling.
    pub loop_id: Vec<i64>,
}

impl Fuse {
    /// Fuse the next sibling loop of `loop_id` into it.
    pub fn new(loop_id: Vec<i64>) -> Self {
        Self { loop_id }
    }

    fn merge(&self, scop: &mut Scop) -> TransformResult<()> {
        if !scop.is_loop(&self.loop_id)? {
            return Err(TransformError::NotALoop {
                loop_id: self.loop_id.clone(),
            });
        }
        let next_loop_id = scop
            .next_sibling_loop(&self.loop_id)?
            .ok_or_else(|| TransformError::NoAdjacentLoop {
                loop_id: self.loop_id.clone(),
            })?;
        // Nonempty: an empty identifier has no sibling and errors above.
        let level = self.loop_id.len();
        let fuse_val = self.loop_id[level - 1];
        let base_val = scop
            .max_id_with_prefix(&self.loop_id)?
            .get(level)
            .expect("max_id_with_prefix returns an ID deeper than the prefix");

        for statement in &mut scop.statements {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(&next_loop_id) {
                continue;
            }
            // Re-tag the statement as belonging to the target loop, then
            // append its sequence position after the target's children.
            statement.scattering.set_id_value(level - 1, fuse_val)?;
            statement.scattering.shift_id_value(level, base_val + 1)?;
        }
        Ok(())
    }
}

impl Transform for Fuse {
    fn apply(&self, scop: &mut Scop) -> Result<()> {
        debug!("fuse(loop={:?})", self.loop_id);
        self.merge(scop)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "fuse"
    }
}
