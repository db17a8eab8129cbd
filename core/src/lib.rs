//! wgraph-core: In-memory directed weighted graph engine.
//!
//! A pure Rust library that stores vertices with arbitrary payloads and
//! ordinal-addressed weighted edges, and provides breadth/depth-first
//! visitation plus single-source (Dijkstra, Bellman-Ford) and all-pairs
//! (Floyd-Warshall) shortest paths.
//!
//! Single-writer: the graph has no interior locking. Path results are
//! immutable snapshots and can be shared freely once computed.

mod config;
mod degree;
mod error;
mod graph;
mod paths;
mod result;
mod traversal;
mod weight;

pub use config::{DuplicateVertexPolicy, GraphConfig};
pub use degree::{degree_centrality, DegreeResult};
pub use error::{GraphError, Result};
pub use graph::{Edge, Graph, GraphSummary, Ordinal, VertexRef};
pub use paths::{bellman_ford, dijkstra, floyd_warshall};
pub use result::{AllToAll, OneToAll};
pub use traversal::{breadth_first_search, depth_first_search, TraversalStats};
pub use weight::Weight;
