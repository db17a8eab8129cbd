use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Ordinal, Vertex};
use crate::weight::Weight;

/// Outcome of a full-graph traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Vertices passed to the visitor. Equals the vertex count.
    pub visited: usize,
    /// The source plus every restart after the frontier ran dry.
    pub starts: usize,
}

/// Dense view of the graph shared by both traversals: vertices by key
/// order and a visited flag per position.
struct Walk<'a, K, D, W> {
    graph: &'a Graph<K, D, W>,
    slots: Vec<(&'a K, &'a Vertex<D>)>,
    visited: Vec<bool>,
    /// Everything below this position is already visited.
    restart_cursor: usize,
    stats: TraversalStats,
}

impl<'a, K, D, W> Walk<'a, K, D, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    fn new(graph: &'a Graph<K, D, W>) -> Self {
        let slots = graph.slots();
        let visited = vec![false; slots.len()];
        Self {
            graph,
            slots,
            visited,
            restart_cursor: 0,
            stats: TraversalStats::default(),
        }
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.slots.binary_search_by(|(k, _)| (*k).cmp(key)).ok()
    }

    /// Position of the head of edge `ordinal`.
    fn head_of(&self, ordinal: Ordinal) -> Option<usize> {
        self.graph
            .edge(ordinal)
            .and_then(|edge| self.position(&edge.head))
    }

    fn outgoing(&self, index: usize) -> &'a [Ordinal] {
        let vertex: &'a Vertex<D> = self.slots[index].1;
        &vertex.outgoing
    }

    fn visit<F: FnMut(&K, &D)>(&mut self, index: usize, visitor: &mut F) {
        self.visited[index] = true;
        self.stats.visited += 1;
        let (key, vertex) = self.slots[index];
        visitor(key, &vertex.data);
    }

    /// Lowest unvisited vertex, used to resume after the frontier empties.
    fn next_unvisited(&mut self) -> Option<usize> {
        while self.restart_cursor < self.visited.len() && self.visited[self.restart_cursor] {
            self.restart_cursor += 1;
        }
        (self.restart_cursor < self.visited.len()).then_some(self.restart_cursor)
    }
}

/// Locate `source`, or report an empty graph as `Ok(None)`.
fn start_position<K, D, W>(walk: &Walk<'_, K, D, W>, source: &K) -> Result<Option<usize>>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    if walk.slots.is_empty() {
        return Ok(None);
    }
    walk.position(source)
        .map(Some)
        .ok_or_else(|| GraphError::vertex_not_found(source))
}

/// Breadth-first visitation of every vertex, beginning at `source`.
///
/// A vertex is passed to `visitor` when it is discovered, in adjacency
/// order, and is never queued twice. When nothing reachable is left the
/// walk resumes from the lowest unvisited key, so every vertex is visited
/// exactly once even in a disconnected graph.
///
/// An empty graph is a no-op; a missing `source` fails with `OutOfRange`.
pub fn breadth_first_search<K, D, W, F>(
    graph: &Graph<K, D, W>,
    source: &K,
    mut visitor: F,
) -> Result<TraversalStats>
where
    K: Ord + Clone + Debug,
    W: Weight,
    F: FnMut(&K, &D),
{
    let mut walk = Walk::new(graph);
    let mut seed = start_position(&walk, source)?;
    let mut queue: VecDeque<usize> = VecDeque::new();

    while let Some(start) = seed {
        walk.stats.starts += 1;
        walk.visit(start, &mut visitor);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &ordinal in walk.outgoing(current) {
                let Some(next) = walk.head_of(ordinal) else {
                    continue;
                };
                if !walk.visited[next] {
                    walk.visit(next, &mut visitor);
                    queue.push_back(next);
                }
            }
        }

        seed = walk.next_unvisited();
    }

    debug!(visited = walk.stats.visited, starts = walk.stats.starts, "breadth-first search");
    Ok(walk.stats)
}

/// Depth-first visitation of every vertex, beginning at `source`.
///
/// Descent follows outgoing-edge order, not weight. Recursion is emulated
/// with an explicit stack of (vertex, edge cursor) frames so deep graphs
/// cannot overflow the call stack. Restart and error behavior match
/// [`breadth_first_search`].
pub fn depth_first_search<K, D, W, F>(
    graph: &Graph<K, D, W>,
    source: &K,
    mut visitor: F,
) -> Result<TraversalStats>
where
    K: Ord + Clone + Debug,
    W: Weight,
    F: FnMut(&K, &D),
{
    let mut walk = Walk::new(graph);
    let mut seed = start_position(&walk, source)?;
    let mut stack: Vec<(usize, usize)> = Vec::new();

    while let Some(start) = seed {
        walk.stats.starts += 1;
        walk.visit(start, &mut visitor);
        let (mut vertex, mut cursor) = (start, 0);

        loop {
            let outgoing = walk.outgoing(vertex);
            while cursor < outgoing.len() {
                match walk.head_of(outgoing[cursor]) {
                    Some(next) if !walk.visited[next] => break,
                    _ => cursor += 1,
                }
            }

            if let Some(next) = outgoing.get(cursor).and_then(|&o| walk.head_of(o)) {
                stack.push((vertex, cursor));
                walk.visit(next, &mut visitor);
                (vertex, cursor) = (next, 0);
            } else if let Some(frame) = stack.pop() {
                (vertex, cursor) = frame;
            } else {
                break;
            }
        }

        seed = walk.next_unvisited();
    }

    debug!(visited = walk.stats.visited, starts = walk.stats.starts, "depth-first search");
    Ok(walk.stats)
}
