use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use serde::Serialize;
use tracing::{trace, warn};

use crate::config::{DuplicateVertexPolicy, GraphConfig};
use crate::error::{GraphError, Result};
use crate::weight::Weight;

/// Stable edge identity. Issued from 1 upward and never reused.
pub type Ordinal = u64;

/// A directed edge stored in the edge arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<K, W = f64> {
    pub ordinal: Ordinal,
    pub tail: K,
    pub head: K,
    pub weight: W,
}

/// Vertex payload plus the ordinals of its incident edges.
///
/// `outgoing` is kept in insertion order and defines adjacency order.
/// `incoming` is the reverse index, also in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct Vertex<D> {
    pub(crate) data: D,
    pub(crate) outgoing: Vec<Ordinal>,
    pub(crate) incoming: Vec<Ordinal>,
}

impl<D> Vertex<D> {
    fn new(data: D) -> Self {
        Self {
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }
}

/// Read-only view of one vertex, handed out by [`Graph::vertices`].
pub struct VertexRef<'a, K, D, W> {
    pub key: &'a K,
    pub data: &'a D,
    outgoing: &'a [Ordinal],
    edges: &'a HashMap<Ordinal, Edge<K, W>>,
}

impl<'a, K, D, W> VertexRef<'a, K, D, W> {
    /// Outgoing edges in adjacency order.
    pub fn outgoing(&self) -> impl Iterator<Item = &'a Edge<K, W>> + 'a {
        let (outgoing, edges) = (self.outgoing, self.edges);
        outgoing.iter().filter_map(move |o| edges.get(o))
    }
}

/// Point-in-time counters for a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub last_ordinal: Ordinal,
    /// None for an empty graph.
    pub max_degree: Option<usize>,
    pub memory_bytes: usize,
}

/// In-memory directed weighted graph.
///
/// Vertices are kept in key order, which makes every "pick the lowest
/// vertex" decision in the traversal and path engines deterministic.
/// Edges live in an arena keyed by ordinal; vertices only hold ordinals,
/// so renaming a vertex never touches another vertex's adjacency lists.
#[derive(Debug, Clone)]
pub struct Graph<K, D, W = f64> {
    vertices: BTreeMap<K, Vertex<D>>,
    edges: HashMap<Ordinal, Edge<K, W>>,
    last_ordinal: Ordinal,
    config: GraphConfig,
}

impl<K, D, W> Graph<K, D, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            vertices: BTreeMap::new(),
            edges: HashMap::with_capacity(config.edge_capacity),
            last_ordinal: 0,
            config,
        }
    }

    /// Pre-allocate the edge arena for a known edge count.
    pub fn with_capacity(edge_count: usize) -> Self {
        Self::with_config(GraphConfig {
            edge_capacity: edge_count,
            ..GraphConfig::default()
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // --- Vertices ---

    /// Insert a vertex. A duplicate key fails with `InvalidValue` unless
    /// the graph was configured with [`DuplicateVertexPolicy::Ignore`].
    pub fn insert_vertex(&mut self, key: K, data: D) -> Result<()> {
        if self.vertices.contains_key(&key) {
            return match self.config.duplicate_vertex {
                DuplicateVertexPolicy::Reject => Err(GraphError::duplicate_key(&key)),
                DuplicateVertexPolicy::Ignore => {
                    warn!(key = ?key, "duplicate vertex ignored");
                    Ok(())
                }
            };
        }
        trace!(key = ?key, "insert vertex");
        self.vertices.insert(key, Vertex::new(data));
        Ok(())
    }

    /// Remove a vertex and every edge that starts or ends at it.
    /// Returns the payload, or None if the key was absent.
    pub fn erase_vertex(&mut self, key: &K) -> Option<D> {
        let vertex = self.vertices.remove(key)?;

        for ordinal in &vertex.outgoing {
            if let Some(edge) = self.edges.remove(ordinal) {
                if let Some(head) = self.vertices.get_mut(&edge.head) {
                    head.incoming.retain(|o| o != ordinal);
                }
            }
        }
        // Self-loops were already dropped above and miss here.
        for ordinal in &vertex.incoming {
            if let Some(edge) = self.edges.remove(ordinal) {
                if let Some(tail) = self.vertices.get_mut(&edge.tail) {
                    tail.outgoing.retain(|o| o != ordinal);
                }
            }
        }

        trace!(key = ?key, edges = self.edges.len(), "erase vertex");
        Some(vertex.data)
    }

    /// Rename a vertex. Data, adjacency and ordinals carry over; every edge
    /// that pointed at `key` now points at `new_key`.
    pub fn reset_key(&mut self, key: &K, new_key: K) -> Result<()> {
        if *key == new_key {
            return Ok(());
        }
        self.vertex(key)?;
        if self.vertices.contains_key(&new_key) {
            return Err(GraphError::duplicate_key(&new_key));
        }
        let Some(vertex) = self.vertices.remove(key) else {
            return Err(GraphError::vertex_not_found(key));
        };

        for ordinal in &vertex.outgoing {
            if let Some(edge) = self.edges.get_mut(ordinal) {
                edge.tail = new_key.clone();
            }
        }
        for ordinal in &vertex.incoming {
            if let Some(edge) = self.edges.get_mut(ordinal) {
                edge.head = new_key.clone();
            }
        }

        trace!(from = ?key, to = ?new_key, "reset key");
        self.vertices.insert(new_key, vertex);
        Ok(())
    }

    pub fn reset_data(&mut self, key: &K, data: D) -> Result<()> {
        *self.vertex_data_mut(key)? = data;
        Ok(())
    }

    pub fn vertex_data(&self, key: &K) -> Result<&D> {
        self.vertex(key).map(|v| &v.data)
    }

    pub fn vertex_data_mut(&mut self, key: &K) -> Result<&mut D> {
        self.vertices
            .get_mut(key)
            .map(|v| &mut v.data)
            .ok_or_else(|| GraphError::vertex_not_found(key))
    }

    pub fn contains_vertex(&self, key: &K) -> bool {
        self.vertices.contains_key(key)
    }

    /// Number of edges ending at `key`.
    pub fn indegree(&self, key: &K) -> Result<usize> {
        self.vertex(key).map(|v| v.incoming.len())
    }

    /// Number of edges starting at `key`.
    pub fn outdegree(&self, key: &K) -> Result<usize> {
        self.vertex(key).map(|v| v.outgoing.len())
    }

    /// Number of edges incident on `key`. A self-loop counts twice.
    pub fn degree(&self, key: &K) -> Result<usize> {
        self.vertex(key).map(|v| v.incoming.len() + v.outgoing.len())
    }

    /// Greatest total degree over all vertices.
    pub fn max_degree(&self) -> Result<usize> {
        self.vertices
            .values()
            .map(|v| v.incoming.len() + v.outgoing.len())
            .max()
            .ok_or(GraphError::EmptyGraph)
    }

    // --- Edges ---

    /// Add a directed edge and return its ordinal. Multi-edges and
    /// self-loops are allowed.
    pub fn insert_edge(&mut self, tail: &K, head: &K, weight: W) -> Result<Ordinal> {
        self.require_endpoints(tail, head)?;

        self.last_ordinal += 1;
        let ordinal = self.last_ordinal;
        if let Some(vertex) = self.vertices.get_mut(tail) {
            vertex.outgoing.push(ordinal);
        }
        if let Some(vertex) = self.vertices.get_mut(head) {
            vertex.incoming.push(ordinal);
        }
        self.edges.insert(
            ordinal,
            Edge {
                ordinal,
                tail: tail.clone(),
                head: head.clone(),
                weight,
            },
        );

        trace!(ordinal, tail = ?tail, head = ?head, "insert edge");
        Ok(ordinal)
    }

    /// Add `tail → head` and `head → tail`, each with its own ordinal.
    pub fn insert_undirected_edge(
        &mut self,
        tail: &K,
        head: &K,
        weight: W,
    ) -> Result<(Ordinal, Ordinal)> {
        self.require_endpoints(tail, head)?;
        let forward = self.insert_edge(tail, head, weight)?;
        let backward = self.insert_edge(head, tail, weight)?;
        Ok((forward, backward))
    }

    /// Ordinals of the edges from `tail` to `head`, in adjacency order.
    pub fn edges(&self, tail: &K, head: &K) -> Result<Vec<Ordinal>> {
        self.require_endpoints(tail, head)?;
        Ok(self.ordinals_between(tail, head))
    }

    /// Ordinals of the edges leaving `tail`, in adjacency order.
    pub fn outedges(&self, tail: &K) -> Result<Vec<Ordinal>> {
        self.vertex(tail).map(|v| v.outgoing.clone())
    }

    /// Ordinals of the edges entering `head`, grouped by tail in key order
    /// and in adjacency order within each tail.
    pub fn inedges(&self, head: &K) -> Result<Vec<Ordinal>> {
        let mut ordinals = self.vertex(head)?.incoming.clone();
        // Ordinals only grow along an adjacency list, so (tail, ordinal)
        // reproduces the per-tail adjacency order.
        ordinals.sort_by_key(|o| (self.edges.get(o).map(|e| &e.tail), *o));
        Ok(ordinals)
    }

    pub fn edge(&self, ordinal: Ordinal) -> Option<&Edge<K, W>> {
        self.edges.get(&ordinal)
    }

    /// Remove the edge with this ordinal wherever it lives.
    /// Returns false if no such edge exists.
    pub fn erase_edge(&mut self, ordinal: Ordinal) -> bool {
        let Some(edge) = self.edges.remove(&ordinal) else {
            return false;
        };
        if let Some(tail) = self.vertices.get_mut(&edge.tail) {
            tail.outgoing.retain(|o| *o != ordinal);
        }
        if let Some(head) = self.vertices.get_mut(&edge.head) {
            head.incoming.retain(|o| *o != ordinal);
        }
        trace!(ordinal, "erase edge");
        true
    }

    /// Remove the edge with this ordinal only if it leaves `tail`.
    pub fn erase_edge_from(&mut self, ordinal: Ordinal, tail: &K) -> bool {
        match self.edges.get(&ordinal) {
            Some(edge) if edge.tail == *tail => self.erase_edge(ordinal),
            _ => false,
        }
    }

    /// Remove every edge from `tail` to `head`. Returns how many were removed;
    /// an absent endpoint removes nothing.
    pub fn erase_edges(&mut self, tail: &K, head: &K) -> usize {
        if !self.contains_vertex(tail) || !self.contains_vertex(head) {
            return 0;
        }
        let ordinals = self.ordinals_between(tail, head);
        self.erase_all(&ordinals)
    }

    pub fn erase_inedges(&mut self, head: &K) -> usize {
        let ordinals = match self.vertices.get(head) {
            Some(vertex) => vertex.incoming.clone(),
            None => return 0,
        };
        self.erase_all(&ordinals)
    }

    pub fn erase_outedges(&mut self, tail: &K) -> usize {
        let ordinals = match self.vertices.get(tail) {
            Some(vertex) => vertex.outgoing.clone(),
            None => return 0,
        };
        self.erase_all(&ordinals)
    }

    pub fn reset_weight(&mut self, ordinal: Ordinal, weight: W) -> Result<()> {
        let edge = self
            .edges
            .get_mut(&ordinal)
            .ok_or_else(|| GraphError::edge_not_found(ordinal))?;
        edge.weight = weight;
        Ok(())
    }

    /// Like [`reset_weight`](Self::reset_weight), but the edge must leave `tail`.
    pub fn reset_weight_from(&mut self, ordinal: Ordinal, tail: &K, weight: W) -> Result<()> {
        self.vertex(tail)?;
        match self.edges.get_mut(&ordinal) {
            Some(edge) if edge.tail == *tail => {
                edge.weight = weight;
                Ok(())
            }
            _ => Err(GraphError::edge_not_found(ordinal)),
        }
    }

    /// Set the weight of every edge from `tail` to `head`. Returns how many
    /// edges changed.
    pub fn reset_weights(&mut self, tail: &K, head: &K, weight: W) -> Result<usize> {
        self.require_endpoints(tail, head)?;
        let ordinals = self.ordinals_between(tail, head);
        for ordinal in &ordinals {
            if let Some(edge) = self.edges.get_mut(ordinal) {
                edge.weight = weight;
            }
        }
        Ok(ordinals.len())
    }

    pub fn edge_weight(&self, ordinal: Ordinal) -> Result<W> {
        self.edges
            .get(&ordinal)
            .map(|e| e.weight)
            .ok_or_else(|| GraphError::edge_not_found(ordinal))
    }

    pub fn edge_weight_from(&self, ordinal: Ordinal, tail: &K) -> Result<W> {
        self.vertex(tail)?;
        match self.edges.get(&ordinal) {
            Some(edge) if edge.tail == *tail => Ok(edge.weight),
            _ => Err(GraphError::edge_not_found(ordinal)),
        }
    }

    // --- Whole graph ---

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drop every vertex and edge and restart ordinals from 1.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.last_ordinal = 0;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Highest ordinal issued so far, 0 if none.
    pub fn last_ordinal(&self) -> Ordinal {
        self.last_ordinal
    }

    /// Vertex keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.vertices.keys()
    }

    /// Vertices in key order, each with its outgoing edges.
    pub fn vertices(&self) -> impl Iterator<Item = VertexRef<'_, K, D, W>> {
        self.vertices.iter().map(|(key, vertex)| VertexRef {
            key,
            data: &vertex.data,
            outgoing: &vertex.outgoing,
            edges: &self.edges,
        })
    }

    /// Outgoing edges of `key` in adjacency order.
    pub fn outgoing(&self, key: &K) -> Result<impl Iterator<Item = &Edge<K, W>>> {
        let vertex = self.vertex(key)?;
        Ok(vertex.outgoing.iter().filter_map(|o| self.edges.get(o)))
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            last_ordinal: self.last_ordinal,
            max_degree: self.max_degree().ok(),
            memory_bytes: self.memory_usage(),
        }
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let vertex_mem: usize = self
            .vertices
            .values()
            .map(|v| {
                size_of::<K>()
                    + size_of::<Vertex<D>>()
                    + (v.outgoing.capacity() + v.incoming.capacity()) * size_of::<Ordinal>()
            })
            .sum();
        let edge_mem = self.edges.capacity() * (size_of::<Ordinal>() + size_of::<Edge<K, W>>());

        vertex_mem + edge_mem
    }

    // --- Crate-internal access for the engines ---

    /// Vertices in key order. Position in this list is the dense index used
    /// by the traversal and path engines.
    pub(crate) fn slots(&self) -> Vec<(&K, &Vertex<D>)> {
        self.vertices.iter().collect()
    }

    /// Every edge, grouped by tail in key order, in adjacency order.
    pub(crate) fn edges_in_order(&self) -> impl Iterator<Item = &Edge<K, W>> {
        self.vertices
            .values()
            .flat_map(|v| v.outgoing.iter())
            .filter_map(|o| self.edges.get(o))
    }

    fn vertex(&self, key: &K) -> Result<&Vertex<D>> {
        self.vertices
            .get(key)
            .ok_or_else(|| GraphError::vertex_not_found(key))
    }

    fn require_endpoints(&self, tail: &K, head: &K) -> Result<()> {
        self.vertex(tail)?;
        self.vertex(head)?;
        Ok(())
    }

    fn ordinals_between(&self, tail: &K, head: &K) -> Vec<Ordinal> {
        self.vertices
            .get(tail)
            .map(|v| {
                v.outgoing
                    .iter()
                    .copied()
                    .filter(|o| self.edges.get(o).is_some_and(|e| e.head == *head))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn erase_all(&mut self, ordinals: &[Ordinal]) -> usize {
        ordinals.iter().filter(|&&o| self.erase_edge(o)).count()
    }
}

impl<K, D, W> Default for Graph<K, D, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    fn default() -> Self {
        Self::new()
    }
}
