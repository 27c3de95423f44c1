//! The scattering substrate: matrices, statement identifiers, dimension names.
//!
//! A scattering relation is an affine map from a statement's enclosing loop
//! iterators (plus parameters and the constant 1) to its logical
//! execution-order coordinates. This module provides:
//! - The integer matrix encoding of that relation ([`ScatteringMatrix`])
//! - The statement-identifier model derived from it ([`StatementId`])
//! - The per-SCoP list of output-dimension names ([`ScatterNames`])

pub mod ident;
pub mod matrix;
pub mod names;

pub use ident::StatementId;
pub use matrix::{RowKind, ScatterRow, ScatteringMatrix};
pub use names::ScatterNames;
