//! The transformation request interface.
//!
//! A request is a tag plus a positional argument list with fixed arity and
//! types per tag. Arguments come in exactly two shapes — a single integer or
//! an integer vector — modeled as the closed variant [`TransformArg`] and
//! checked exhaustively when a [`TransformRequest`] is built, so malformed
//! tags and arities surface as hard errors instead of unchecked casts.
//!
//! The `unroll` tag is reserved and reports unsupported when applied.

use crate::scop::Scop;
use crate::transform::{Fuse, Interchange, Reorder, Skew, Split, StripMine, Transform};
use crate::utils::errors::{TransformError, TransformResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One positional argument of a transformation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformArg {
    /// A single integer.
    Int(i64),
    /// An integer vector, e.g. a loop identifier or a permutation.
    Vector(Vec<i64>),
}

/// The tag of a transformation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Split a sequence point.
    Split,
    /// Permute siblings under a loop.
    Reorder,
    /// Swap two loop depths.
    Interchange,
    /// Merge a loop with its next sibling.
    Fuse,
    /// Skew one loop by another.
    Skew,
    /// Strip-mine (tile) a loop.
    Tile,
    /// Reserved, unimplemented.
    Unroll,
}

impl TransformKind {
    fn tag(self) -> &'static str {
        match self {
            TransformKind::Split => "split",
            TransformKind::Reorder => "reorder",
            TransformKind::Interchange => "interchange",
            TransformKind::Fuse => "fuse",
            TransformKind::Skew => "skew",
            TransformKind::Tile => "tile",
            TransformKind::Unroll => "unroll",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fully typed transformation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformRequest {
    /// `split([id...], depth)`
    Split {
        /// Statement ID of the split point.
        point: Vec<i64>,
        /// 1-based split depth.
        depth: usize,
    },
    /// `reorder([loop...], [order...])`
    Reorder {
        /// Loop identifier; empty addresses the root.
        loop_id: Vec<i64>,
        /// Permutation indexed by old sibling value.
        new_order: Vec<i64>,
    },
    /// `interchange([loop...], depth1, depth2, pretty)`
    Interchange {
        /// Loop identifier.
        loop_id: Vec<i64>,
        /// First 1-based depth.
        depth1: usize,
        /// Second 1-based depth.
        depth2: usize,
        /// Swap the corresponding dimension names too.
        pretty: bool,
    },
    /// `fuse([loop...])`
    Fuse {
        /// Loop identifier of the absorbing loop.
        loop_id: Vec<i64>,
    },
    /// `skew([loop...], depth, depth_other, coeff)`
    Skew {
        /// Loop identifier.
        loop_id: Vec<i64>,
        /// 1-based source depth.
        depth: usize,
        /// 1-based depth being skewed.
        depth_other: usize,
        /// Skew coefficient.
        coeff: i64,
    },
    /// `tile([loop...], depth, size)`
    Tile {
        /// Loop identifier.
        loop_id: Vec<i64>,
        /// 1-based depth of the loop being blocked.
        depth: usize,
        /// Tile size.
        size: i64,
    },
    /// `unroll([loop...], factor)` — reserved.
    Unroll {
        /// Loop identifier.
        loop_id: Vec<i64>,
        /// Unroll factor.
        factor: i64,
    },
}

impl TransformRequest {
    /// Build a typed request from a tag and a positional argument list,
    /// checking arity and argument shapes.
    pub fn from_args(kind: TransformKind, args: &[TransformArg]) -> TransformResult<Self> {
        match kind {
            TransformKind::Split => {
                check_arity(kind, args, 2)?;
                Ok(TransformRequest::Split {
                    point: vector_arg(kind, args, 0)?,
                    depth: depth_arg(kind, args, 1)?,
                })
            }
            TransformKind::Reorder => {
                check_arity(kind, args, 2)?;
                Ok(TransformRequest::Reorder {
                    loop_id: vector_arg(kind, args, 0)?,
                    new_order: vector_arg(kind, args, 1)?,
                })
            }
            TransformKind::Interchange => {
                check_arity(kind, args, 4)?;
                Ok(TransformRequest::Interchange {
                    loop_id: vector_arg(kind, args, 0)?,
                    depth1: depth_arg(kind, args, 1)?,
                    depth2: depth_arg(kind, args, 2)?,
                    pretty: int_arg(kind, args, 3)? != 0,
                })
            }
            TransformKind::Fuse => {
                check_arity(kind, args, 1)?;
                Ok(TransformRequest::Fuse {
                    loop_id: vector_arg(kind, args, 0)?,
                })
            }
            TransformKind::Skew => {
                check_arity(kind, args, 4)?;
                Ok(TransformRequest::Skew {
                    loop_id: vector_arg(kind, args, 0)?,
                    depth: depth_arg(kind, args, 1)?,
                    depth_other: depth_arg(kind, args, 2)?,
                    coeff: int_arg(kind, args, 3)?,
                })
            }
            TransformKind::Tile => {
                check_arity(kind, args, 3)?;
                Ok(TransformRequest::Tile {
                    loop_id: vector_arg(kind, args, 0)?,
                    depth: depth_arg(kind, args, 1)?,
                    size: int_arg(kind, args, 2)?,
                })
            }
            TransformKind::Unroll => {
                check_arity(kind, args, 2)?;
                Ok(TransformRequest::Unroll {
                    loop_id: vector_arg(kind, args, 0)?,
                    factor: int_arg(kind, args, 1)?,
                })
            }
        }
    }

    /// The request's tag.
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformRequest::Split { .. } => TransformKind::Split,
            TransformRequest::Reorder { .. } => TransformKind::Reorder,
            TransformRequest::Interchange { .. } => TransformKind::Interchange,
            TransformRequest::Fuse { .. } => TransformKind::Fuse,
            TransformRequest::Skew { .. } => TransformKind::Skew,
            TransformRequest::Tile { .. } => TransformKind::Tile,
            TransformRequest::Unroll { .. } => TransformKind::Unroll,
        }
    }

    /// Dispatch the request to its transformation and apply it.
    pub fn apply(&self, scop: &mut Scop) -> Result<()> {
        match self.clone() {
            TransformRequest::Split { point, depth } => Split::new(point, depth).apply(scop),
            TransformRequest::Reorder { loop_id, new_order } => {
                Reorder::new(loop_id, new_order).apply(scop)
            }
            TransformRequest::Interchange {
                loop_id,
                depth1,
                depth2,
                pretty,
            } => Interchange::new(loop_id, depth1, depth2, pretty).apply(scop),
            TransformRequest::Fuse { loop_id } => Fuse::new(loop_id).apply(scop),
            TransformRequest::Skew {
                loop_id,
                depth,
                depth_other,
                coeff,
            } => Skew::new(loop_id, depth, depth_other, coeff).apply(scop),
            TransformRequest::Tile {
                loop_id,
                depth,
                size,
            } => StripMine::new(loop_id, depth, size).apply(scop),
            TransformRequest::Unroll { .. } => Err(TransformError::Unsupported("unroll").into()),
        }
    }
}

fn check_arity(kind: TransformKind, args: &[TransformArg], expected: usize) -> TransformResult<()> {
    if args.len() != expected {
        return Err(TransformError::ArityMismatch {
            kind: kind.tag(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn int_arg(kind: TransformKind, args: &[TransformArg], index: usize) -> TransformResult<i64> {
    match &args[index] {
        TransformArg::Int(v) => Ok(*v),
        TransformArg::Vector(_) => Err(TransformError::BadArgument {
            kind: kind.tag(),
            index,
            expected: "an integer",
        }),
    }
}

fn vector_arg(
    kind: TransformKind,
    args: &[TransformArg],
    index: usize,
) -> TransformResult<Vec<i64>> {
    match &args[index] {
        TransformArg::Vector(v) => Ok(v.clone()),
        TransformArg::Int(_) => Err(TransformError::BadArgument {
            kind: kind.tag(),
            index,
            expected: "an integer vector",
        }),
    }
}

fn depth_arg(kind: TransformKind, args: &[TransformArg], index: usize) -> TransformResult<usize> {
    usize::try_from(int_arg(kind, args, index)?).map_err(|_| TransformError::BadArgument {
        kind: kind.tag(),
        index,
        expected: "a non-negative depth",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scattering::ScatteringMatrix;
    use crate::scop::Statement;

    #[test]
    fn test_from_args_split() {
        let request = TransformRequest::from_args(
            TransformKind::Split,
            &[TransformArg::Vector(vec![0, 1]), TransformArg::Int(1)],
        )
        .unwrap();
        assert_eq!(
            request,
            TransformRequest::Split {
                point: vec![0, 1],
                depth: 1
            }
        );
        assert_eq!(request.kind(), TransformKind::Split);
    }

    #[test]
    fn test_from_args_arity_mismatch() {
        let err = TransformRequest::from_args(
            TransformKind::Fuse,
            &[TransformArg::Vector(vec![0]), TransformArg::Int(3)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransformError::ArityMismatch {
                kind: "fuse",
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn test_from_args_wrong_shape() {
        let err = TransformRequest::from_args(
            TransformKind::Skew,
            &[
                TransformArg::Int(0),
                TransformArg::Int(1),
                TransformArg::Int(2),
                TransformArg::Int(1),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::BadArgument { index: 0, .. }));
    }

    #[test]
    fn test_apply_dispatch() {
        let mut scop = Scop::new("test");
        scop.statements.push(Statement::new(
            "S0",
            ScatteringMatrix::from_position(&[0, 1], 0),
        ));
        scop.statements.push(Statement::new(
            "S1",
            ScatteringMatrix::from_position(&[0, 2], 0),
        ));
        let request = TransformRequest::from_args(
            TransformKind::Split,
            &[TransformArg::Vector(vec![0, 1]), TransformArg::Int(1)],
        )
        .unwrap();
        request.apply(&mut scop).unwrap();
        let ids = scop.statement_ids().unwrap();
        assert_eq!(ids[0].values(), &[0, 1]);
        assert_eq!(ids[1].values(), &[1, 2]);
    }

    #[test]
    fn test_unroll_reserved() {
        let mut scop = Scop::new("test");
        let request = TransformRequest::Unroll {
            loop_id: vec![0],
            factor: 4,
        };
        let err = request.apply(&mut scop).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TransformError>(),
            Some(&TransformError::Unsupported("unroll"))
        );
    }

    #[test]
    fn test_request_serde_roundtrip() {
        let request = TransformRequest::Tile {
            loop_id: vec![0, 1],
            depth: 2,
            size: 32,
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: TransformRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
