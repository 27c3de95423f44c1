//! # PolyShift - Scattering-Matrix Loop Transformations
//!
//! A library for rewriting the scattering (schedule) relations of a SCoP —
//! a Static Control Part in the polyhedral model — to realize classic
//! loop-nest transformations:
//! - splitting a sequence point
//! - reordering sibling statements and loops
//! - interchanging two loop depths
//! - fusing two adjacent loops
//! - skewing one loop by another
//! - strip-mining (tiling) a loop
//!
//! ## Architecture
//!
//! ```text
//! SCoP (front-end) → Transformation Engine → SCoP (back-end / codegen)
//!                        │
//!                        ├─ scattering: matrices, statement IDs, dim names
//!                        └─ transform:  split / reorder / interchange /
//!                                       fuse / skew / strip-mine
//! ```
//!
//! Extraction of a SCoP from source code and generation of target code from
//! the transformed SCoP are external collaborators; the engine only promises
//! that the scattering relations it hands back are well-formed.
//!
//! ## Example
//!
//! ```rust
//! use polyshift::prelude::*;
//!
//! // Two statements under the outermost loop: IDs [0, 0] and [0, 1].
//! let mut scop = Scop::new("example");
//! scop.statements.push(Statement::new("S0", ScatteringMatrix::from_position(&[0, 0], 0)));
//! scop.statements.push(Statement::new("S1", ScatteringMatrix::from_position(&[0, 1], 0)));
//! scop.scatter_names = ScatterNames::canonical(3);
//!
//! // Swap the two statements inside loop [0].
//! Reorder::new(vec![0], vec![1, 0]).apply(&mut scop).unwrap();
//!
//! let ids = scop.statement_ids().unwrap();
//! assert_eq!(ids[0].values(), &[0, 1]);
//! assert_eq!(ids[1].values(), &[0, 0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scattering;
pub mod scop;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::scattering::{RowKind, ScatterNames, ScatterRow, ScatteringMatrix, StatementId};
    pub use crate::scop::{Scop, Statement};
    pub use crate::transform::{
        Fuse, Interchange, Reorder, Skew, Split, StripMine, Transform, TransformArg,
        TransformKind, TransformRequest,
    };
    pub use crate::utils::errors::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
