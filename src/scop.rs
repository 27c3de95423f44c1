//! The SCoP model: a list of statements plus scattering dimension names.
//!
//! A Static Control Part is supplied by an external front-end and owned by
//! the caller; the engine mutates its scattering matrices and name list in
//! place and hands it back for code generation or further transformation.
//! The engine never creates or destroys statements.

use crate::scattering::{ScatterNames, ScatteringMatrix, StatementId};
use crate::utils::errors::ScopError;
use std::fmt;

/// A statement inside a SCoP: a label plus its scattering relation.
///
/// Iteration domains and access relations belong to the external
/// collaborators; the engine only reads and rewrites the scattering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Human-readable label, e.g. `S0`.
    pub name: String,
    /// The statement's scattering matrix.
    pub scattering: ScatteringMatrix,
}

impl Statement {
    /// Create a statement from a label and its scattering matrix.
    pub fn new(name: impl Into<String>, scattering: ScatteringMatrix) -> Self {
        Self {
            name: name.into(),
            scattering,
        }
    }
}

/// A Static Control Part: the unit every transformation operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scop {
    /// Name of the region the front-end extracted.
    pub name: String,
    /// Statements in textual order.
    pub statements: Vec<Statement>,
    /// One name per scattering output dimension (maximum over statements).
    pub scatter_names: ScatterNames,
}

impl Scop {
    /// Create an empty SCoP.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
            scatter_names: ScatterNames::new(),
        }
    }

    /// The statement IDs of all statements, in statement order.
    pub fn statement_ids(&self) -> Result<Vec<StatementId>, ScopError> {
        self.statements
            .iter()
            .map(|s| s.scattering.statement_id())
            .collect()
    }

    /// Whether `loop_id` addresses an actual loop: some statement is governed
    /// by the prefix *and* that statement has an iterator dimension beyond it
    /// (more output dimensions than `2 * loop_id.len() - 1`). A prefix that
    /// addresses only a leaf statement, or nothing, is not a loop.
    pub fn is_loop(&self, loop_id: &[i64]) -> Result<bool, ScopError> {
        for statement in &self.statements {
            let id = statement.scattering.statement_id()?;
            if id.in_loop(loop_id) && statement.scattering.n_output_dims() >= 2 * loop_id.len() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The loop immediately following `loop_id` at the same nesting level:
    /// the identifier with its last component incremented, if that addresses
    /// a loop. The root has no sibling.
    pub fn next_sibling_loop(&self, loop_id: &[i64]) -> Result<Option<Vec<i64>>, ScopError> {
        let Some((&last, prefix)) = loop_id.split_last() else {
            return Ok(None);
        };
        let mut next = prefix.to_vec();
        next.push(last + 1);
        if self.is_loop(&next)? {
            Ok(Some(next))
        } else {
            Ok(None)
        }
    }

    /// The lexicographically maximal statement ID under `loop_id`, compared
    /// and tie-broken at position `loop_id.len()`.
    ///
    /// # Panics
    ///
    /// Panics if no statement carries the prefix, or if every carrier is too
    /// shallow to have a component at `loop_id.len()`. Querying a prefix known
    /// not to exist is a caller contract violation, not a recoverable error.
    pub fn max_id_with_prefix(&self, loop_id: &[i64]) -> Result<StatementId, ScopError> {
        let level = loop_id.len();
        let mut best: Option<StatementId> = None;
        for statement in &self.statements {
            let id = statement.scattering.statement_id()?;
            if !id.in_loop(loop_id) || id.len() <= level {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => id.get(level) > current.get(level),
            };
            if better {
                best = Some(id);
            }
        }
        match best {
            Some(id) => Ok(id),
            None => panic!("no statement carries loop prefix {loop_id:?}"),
        }
    }
}

impl fmt::Display for Scop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<scop {}>", self.name)?;
        if !self.scatter_names.is_empty() {
            writeln!(f, "# scatnames: {}", self.scatter_names)?;
        }
        for statement in &self.statements {
            writeln!(f, "# statement {}", statement.name)?;
            write!(f, "{}", statement.scattering)?;
        }
        write!(f, "</scop>")
    }
}
