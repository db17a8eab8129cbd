use thiserror::Error;

use crate::graph::Ordinal;

/// Errors reported by graph mutations, queries and path algorithms.
///
/// Every error is detected before any state changes, so a failed call
/// leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A referenced vertex key or edge ordinal does not exist.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The operation needs at least one vertex.
    #[error("empty graph")]
    EmptyGraph,

    /// The operation would break key uniqueness.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A config document could not be parsed.
    #[error("invalid config: {0}")]
    Config(String),

    /// Dijkstra relaxed an edge with a negative weight.
    #[error("negative weight on edge #{0}")]
    NegativeWeight(Ordinal),

    /// A negative-weight cycle makes shortest paths undefined.
    #[error("negative cycle detected")]
    NegativeCycle,
}

impl GraphError {
    pub(crate) fn vertex_not_found<K: std::fmt::Debug>(key: &K) -> Self {
        GraphError::OutOfRange(format!("vertex {:?} not found", key))
    }

    pub(crate) fn edge_not_found(ordinal: Ordinal) -> Self {
        GraphError::OutOfRange(format!("edge #{} not found", ordinal))
    }

    pub(crate) fn duplicate_key<K: std::fmt::Debug>(key: &K) -> Self {
        GraphError::InvalidValue(format!("vertex {:?} already exists", key))
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
