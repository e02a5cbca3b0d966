use thiserror::Error;

use crate::store::ShapeId;

/// Failures of the geometric algorithms.
///
/// Every variant is recoverable: the operation that produced it leaves its
/// inputs untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {what}")]
    Degenerate { what: &'static str },

    #[error("linear system is rank deficient (rank {rank})")]
    RankDeficient { rank: usize },

    #[error("intersection line misses all {edges} edges")]
    OutOfBounds { edges: usize },

    #[error("expected {expected} corners, found {found}")]
    MissingState { expected: usize, found: usize },
}

/// Failures of editing commands on a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("no shape with id {0:?}")]
    UnknownShape(ShapeId),

    #[error("selection does not fit the command: {0}")]
    InvalidSelection(&'static str),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
