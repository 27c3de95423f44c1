//! Error types for the transformation engine.
//!
//! Two layers: [`ScopError`] for malformed scattering matrices (conditions a
//! well-formed SCoP never produces), and [`TransformError`] for invalid
//! requests and loop references. Missing-prefix contract violations are not
//! errors at all — `Scop::max_id_with_prefix` panics, because the caller
//! queried a prefix known not to exist.

use thiserror::Error;

/// A malformed scattering matrix was observed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopError {
    /// No row defines an even output dimension; a well-formed scattering
    /// matrix has exactly one.
    #[error("no row defines scattering dimension {dim}")]
    MissingIdRow {
        /// The output dimension without a defining row.
        dim: usize,
    },

    /// A scattering constant does not fit a statement-ID component.
    #[error("scattering constant at dimension {dim} does not fit in i64")]
    IdOutOfRange {
        /// The output dimension whose constant overflowed.
        dim: usize,
    },

    /// A dimension-name index is past the end of the name list.
    #[error("scattering name index {index} out of range (have {len} names)")]
    NameOutOfRange {
        /// The requested name index.
        index: usize,
        /// Current length of the name list.
        len: usize,
    },
}

/// A transformation request could not be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The loop identifier does not address an actual loop.
    #[error("{loop_id:?} does not address a loop")]
    NotALoop {
        /// The offending loop identifier.
        loop_id: Vec<i64>,
    },

    /// Fusion found no adjacent loop at the same nesting level.
    #[error("loop {loop_id:?} has no next sibling loop to fuse with")]
    NoAdjacentLoop {
        /// The loop that was to absorb its sibling.
        loop_id: Vec<i64>,
    },

    /// A 1-based depth argument falls outside a statement's dimensionality.
    #[error("depth {depth} out of range for a statement with {n_output} output dimensions")]
    DepthOutOfRange {
        /// The requested 1-based depth.
        depth: usize,
        /// The statement's output-dimension count.
        n_output: usize,
    },

    /// A reorder permutation does not cover a sibling value present at the
    /// reordered depth.
    #[error("sibling value {value} not covered by permutation of length {len}")]
    BadPermutation {
        /// The sibling value read from a statement.
        value: i64,
        /// Length of the supplied permutation.
        len: usize,
    },

    /// A strip-mine size must be at least 1.
    #[error("invalid tile size {0}")]
    InvalidTileSize(i64),

    /// The transformation tag is reserved but not implemented.
    #[error("transformation `{0}` is not implemented")]
    Unsupported(&'static str),

    /// A request carried the wrong number of arguments for its tag.
    #[error("`{kind}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// The transformation tag.
        kind: &'static str,
        /// Expected argument count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// A request argument had the wrong variant or an unusable value.
    #[error("`{kind}` argument {index}: expected {expected}")]
    BadArgument {
        /// The transformation tag.
        kind: &'static str,
        /// Zero-based position of the offending argument.
        index: usize,
        /// What the argument should have been.
        expected: &'static str,
    },

    /// The underlying scattering matrix was malformed.
    #[error(transparent)]
    Scop(#[from] ScopError),
}

/// Result type for transformation application.
pub type TransformResult<T> = Result<T, TransformError>;
