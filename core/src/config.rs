use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// What `insert_vertex` does when the key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateVertexPolicy {
    /// Fail with `InvalidValue`.
    #[default]
    Reject,
    /// Keep the existing vertex untouched and report success.
    Ignore,
}

/// Construction-time settings for a [`Graph`](crate::Graph).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub duplicate_vertex: DuplicateVertexPolicy,
    /// Pre-allocation hint for the edge arena.
    pub edge_capacity: usize,
}

impl GraphConfig {
    /// Parse a JSON config document. Missing fields take their defaults;
    /// malformed input fails with `GraphError::Config`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GraphError::Config(e.to_string()))
    }

    pub fn with_duplicate_vertex(mut self, policy: DuplicateVertexPolicy) -> Self {
        self.duplicate_vertex = policy;
        self
    }
}
