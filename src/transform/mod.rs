//! Loop transformations over SCoP scattering matrices.
//!
//! Each transformation is a pass over the statement list: statements matching
//! a loop-membership predicate get their scattering matrix rewritten in
//! place. Per-statement updates are independent, so traversal order does not
//! affect the result; strip-mine's name-list rewrite is a single global
//! mutation performed once after the per-statement loop.
//!
//! The engine applies the requested affine rewrite without legality checking;
//! verifying that a transformation preserves dependences is the caller's
//! responsibility.

pub mod fusion;
pub mod interchange;
pub mod reorder;
pub mod request;
pub mod skewing;
pub mod split;
pub mod stripmine;

pub use fusion::Fuse;
pub use interchange::Interchange;
pub use reorder::Reorder;
pub use request::{TransformArg, TransformKind, TransformRequest};
pub use skewing::Skew;
pub use split::Split;
pub use stripmine::StripMine;

use crate::scop::Scop;
use anyhow::Result;

/// Transformation pass trait.
pub trait Transform {
    /// Apply the transformation to the SCoP in place.
    fn apply(&self, scop: &mut Scop) -> Result<()>;

    /// Get transformation name.
    fn name(&self) -> &str;
}
