use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Ordinal};
use crate::result::{AllToAll, OneToAll};
use crate::weight::Weight;

/// Heap entry for Dijkstra. Ordered so that `BinaryHeap` pops the smallest
/// distance first, and the lowest key among equal distances.
#[derive(Debug, Clone, Copy)]
struct QueueEntry<W> {
    distance: W,
    index: usize,
}

impl<W: Weight> Ord for QueueEntry<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl<W: Weight> PartialOrd for QueueEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Weight> PartialEq for QueueEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: Weight> Eq for QueueEntry<W> {}

/// Dense view of a graph: sorted vertex keys, every edge as
/// (tail index, head index, weight, ordinal) grouped by tail in key order and
/// in adjacency order within a tail, and per-tail offsets into `edges`.
struct Indexed<K, W> {
    keys: Vec<K>,
    edges: Vec<(usize, usize, W, Ordinal)>,
    offsets: Vec<usize>,
}

impl<K, W> Indexed<K, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    fn build<D>(graph: &Graph<K, D, W>) -> Self {
        let keys: Vec<K> = graph.keys().cloned().collect();
        let edges: Vec<(usize, usize, W, Ordinal)> = graph
            .edges_in_order()
            .filter_map(|edge| {
                let tail = keys.binary_search(&edge.tail).ok()?;
                let head = keys.binary_search(&edge.head).ok()?;
                Some((tail, head, edge.weight, edge.ordinal))
            })
            .collect();

        let mut offsets = vec![0usize; keys.len() + 1];
        for &(tail, ..) in &edges {
            offsets[tail + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }
        Self {
            keys,
            edges,
            offsets,
        }
    }

    fn position(&self, key: &K) -> Result<usize> {
        self.keys
            .binary_search(key)
            .map_err(|_| GraphError::vertex_not_found(key))
    }

    fn outgoing(&self, tail: usize) -> &[(usize, usize, W, Ordinal)] {
        &self.edges[self.offsets[tail]..self.offsets[tail + 1]]
    }
}

/// Single-source shortest paths for non-negative weights.
///
/// Uses a binary heap keyed by tentative distance and skips stale entries
/// instead of decreasing keys in place. A distance only changes on a strict
/// improvement, so the first predecessor found among equal-cost paths wins.
///
/// Fails with `OutOfRange` if `source` is missing and with `NegativeWeight`
/// as soon as a settled vertex has a negative outgoing edge. Edges in parts
/// of the graph unreachable from `source` are never inspected.
pub fn dijkstra<K, D, W>(graph: &Graph<K, D, W>, source: &K) -> Result<OneToAll<K, W>>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    let indexed = Indexed::build(graph);
    let start = indexed.position(source)?;
    let n = indexed.keys.len();

    let mut distance = vec![W::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    distance[start] = W::ZERO;
    heap.push(QueueEntry {
        distance: W::ZERO,
        index: start,
    });

    let mut settled_count = 0usize;
    while let Some(QueueEntry { distance: d, index: u }) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;
        settled_count += 1;

        for &(_, v, weight, ordinal) in indexed.outgoing(u) {
            if weight.is_negative() {
                debug!(ordinal, "dijkstra: negative weight");
                return Err(GraphError::NegativeWeight(ordinal));
            }
            let candidate = d + weight;
            if candidate < distance[v] {
                distance[v] = candidate;
                previous[v] = Some(u);
                heap.push(QueueEntry {
                    distance: candidate,
                    index: v,
                });
            }
        }
    }

    debug!(vertices = n, settled = settled_count, "dijkstra");
    Ok(OneToAll::new(indexed.keys, start, distance, previous))
}

/// Single-source shortest paths for arbitrary weights.
///
/// Relaxes every edge for at most `|V| - 1` passes, stopping early once a
/// pass changes nothing. A final scan that still finds an improvable edge
/// proves a negative cycle reachable from `source`.
pub fn bellman_ford<K, D, W>(graph: &Graph<K, D, W>, source: &K) -> Result<OneToAll<K, W>>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    let indexed = Indexed::build(graph);
    let start = indexed.position(source)?;
    let n = indexed.keys.len();

    let mut distance = vec![W::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    distance[start] = W::ZERO;

    let mut passes = 0usize;
    for _ in 1..n {
        passes += 1;
        let mut updated = false;
        for &(u, v, weight, _) in &indexed.edges {
            if !distance[u].is_finite() {
                continue;
            }
            let candidate = distance[u] + weight;
            if candidate < distance[v] {
                distance[v] = candidate;
                previous[v] = Some(u);
                updated = true;
            }
        }
        if !updated {
            break;
        }
    }

    let improvable = indexed
        .edges
        .iter()
        .any(|&(u, v, weight, _)| distance[u].is_finite() && distance[u] + weight < distance[v]);
    if improvable {
        debug!(vertices = n, passes, "bellman-ford: negative cycle");
        return Err(GraphError::NegativeCycle);
    }

    debug!(vertices = n, edges = indexed.edges.len(), passes, "bellman-ford");
    Ok(OneToAll::new(indexed.keys, start, distance, previous))
}

/// All-pairs shortest paths with successor-based path reconstruction.
///
/// Parallel edges seed the table with their minimum weight; a negative
/// self-loop seeds its diagonal entry directly. Fails with `NegativeCycle`
/// if any diagonal entry ends up negative. An empty graph yields an empty
/// result.
pub fn floyd_warshall<K, D, W>(graph: &Graph<K, D, W>) -> Result<AllToAll<K, W>>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    let indexed = Indexed::build(graph);
    let n = indexed.keys.len();

    let mut distance = vec![W::INFINITY; n * n];
    let mut successor: Vec<Option<usize>> = vec![None; n * n];
    for i in 0..n {
        distance[i * n + i] = W::ZERO;
        successor[i * n + i] = Some(i);
    }
    for &(u, v, weight, _) in &indexed.edges {
        if weight < distance[u * n + v] {
            distance[u * n + v] = weight;
            successor[u * n + v] = Some(v);
        }
    }

    for k in 0..n {
        for i in 0..n {
            let via = distance[i * n + k];
            if !via.is_finite() {
                continue;
            }
            for j in 0..n {
                let rest = distance[k * n + j];
                if !rest.is_finite() {
                    continue;
                }
                let candidate = via + rest;
                if candidate < distance[i * n + j] {
                    distance[i * n + j] = candidate;
                    successor[i * n + j] = successor[i * n + k];
                }
            }
        }
    }

    if (0..n).any(|i| distance[i * n + i].is_negative()) {
        debug!(vertices = n, "floyd-warshall: negative cycle");
        return Err(GraphError::NegativeCycle);
    }

    debug!(vertices = n, edges = indexed.edges.len(), "floyd-warshall");
    Ok(AllToAll::new(indexed.keys, distance, successor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(keys: &[&'static str], edges: &[(&'static str, &'static str, f64)]) -> Graph<&'static str, ()> {
        let mut g = Graph::new();
        for &key in keys {
            g.insert_vertex(key, ()).unwrap();
        }
        for &(tail, head, weight) in edges {
            g.insert_edge(&tail, &head, weight).unwrap();
        }
        g
    }

    fn triangle() -> Graph<&'static str, ()> {
        graph_with(
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 5.0)],
        )
    }

    // Small road network with a parallel pair (Kafa→Sele) and a self-loop.
    fn towns() -> Graph<&'static str, ()> {
        graph_with(
            &["Bono", "Fiki", "Kafa", "Piri", "Sele", "Tumu"],
            &[
                ("Piri", "Kafa", 0.5),
                ("Kafa", "Piri", 0.4),
                ("Piri", "Sele", 1.2),
                ("Sele", "Piri", 0.8),
                ("Kafa", "Sele", 2.8),
                ("Kafa", "Sele", 1.1),
                ("Sele", "Kafa", 0.7),
                ("Piri", "Tumu", 1.0),
                ("Tumu", "Piri", 1.3),
                ("Piri", "Bono", 0.8),
                ("Bono", "Piri", 0.9),
                ("Tumu", "Bono", 0.6),
                ("Bono", "Tumu", 0.4),
                ("Bono", "Fiki", 2.3),
                ("Fiki", "Bono", 2.4),
                ("Fiki", "Fiki", 1.6),
            ],
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    // --- Dijkstra tests ---

    #[test]
    fn test_dijkstra_prefers_cheaper_detour() {
        let r = dijkstra(&triangle(), &"A").unwrap();
        assert_eq!(r.path_cost(&"C").unwrap(), 2.0);
        assert_eq!(r.path_vertices(&"C").unwrap(), vec!["A", "B", "C"]);
        assert_eq!(r.path_vertices(&"A").unwrap(), vec!["A"]);
    }

    #[test]
    fn test_dijkstra_unreachable() {
        let g = graph_with(&["A", "B", "C"], &[("A", "B", 1.0), ("C", "A", 1.0)]);
        let r = dijkstra(&g, &"A").unwrap();
        assert_eq!(r.path_cost(&"C").unwrap(), f64::INFINITY);
        assert!(r.path_vertices(&"C").unwrap().is_empty());
        assert_eq!(r.predecessor(&"C").unwrap(), None);
    }

    #[test]
    fn test_dijkstra_parallel_edges_use_minimum() {
        let r = dijkstra(&towns(), &"Kafa").unwrap();
        assert_close(r.path_cost(&"Sele").unwrap(), 1.1);
        assert_eq!(r.path_vertices(&"Sele").unwrap(), vec!["Kafa", "Sele"]);
    }

    #[test]
    fn test_dijkstra_towns() {
        let r = dijkstra(&towns(), &"Sele").unwrap();
        assert_close(r.path_cost(&"Fiki").unwrap(), 0.8 + 0.8 + 2.3);
        assert_eq!(r.path_vertices(&"Fiki").unwrap(), vec!["Sele", "Piri", "Bono", "Fiki"]);
        assert_close(r.path_cost(&"Tumu").unwrap(), 0.8 + 1.0);
    }

    #[test]
    fn test_dijkstra_negative_weight() {
        let g = graph_with(&["A", "B", "C"], &[("A", "B", 1.0), ("B", "C", -1.0)]);
        assert_eq!(dijkstra(&g, &"A").unwrap_err(), GraphError::NegativeWeight(2));
    }

    #[test]
    fn test_dijkstra_negative_weight_unreachable_is_ignored() {
        let g = graph_with(&["A", "B", "C"], &[("A", "B", 1.0), ("C", "B", -1.0)]);
        let r = dijkstra(&g, &"A").unwrap();
        assert_eq!(r.path_cost(&"B").unwrap(), 1.0);
    }

    #[test]
    fn test_dijkstra_missing_source() {
        assert!(matches!(dijkstra(&triangle(), &"Z"), Err(GraphError::OutOfRange(_))));
    }

    #[test]
    fn test_dijkstra_zero_weight_tie_keeps_first() {
        // Two equal-cost routes A→B→D and A→C→D: B is settled first (lower key)
        let g = graph_with(
            &["A", "B", "C", "D"],
            &[("A", "B", 1.0), ("A", "C", 1.0), ("B", "D", 1.0), ("C", "D", 1.0)],
        );
        let r = dijkstra(&g, &"A").unwrap();
        assert_eq!(r.path_vertices(&"D").unwrap(), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_dijkstra_skips_vertices_without_outgoing_edges() {
        let g = graph_with(
            &["A", "B", "C", "D", "E"],
            &[("A", "C", 2.0), ("C", "E", 1.5), ("E", "B", 0.5), ("D", "A", 1.0)],
        );
        let r = dijkstra(&g, &"A").unwrap();
        assert_eq!(r.path_cost(&"B").unwrap(), 4.0);
        assert_eq!(r.path_vertices(&"B").unwrap(), vec!["A", "C", "E", "B"]);
        assert!(!r.is_reachable(&"D").unwrap());
    }

    // --- Bellman-Ford tests ---

    #[test]
    fn test_bellman_ford_matches_dijkstra() {
        let g = towns();
        for source in ["Bono", "Kafa", "Sele"] {
            let d = dijkstra(&g, &source).unwrap();
            let b = bellman_ford(&g, &source).unwrap();
            for key in g.keys() {
                assert_close(d.path_cost(key).unwrap(), b.path_cost(key).unwrap());
            }
        }
    }

    #[test]
    fn test_bellman_ford_negative_edge() {
        let g = graph_with(
            &["A", "B", "C"],
            &[("A", "B", 4.0), ("A", "C", 1.0), ("C", "B", -2.0)],
        );
        let r = bellman_ford(&g, &"A").unwrap();
        assert_eq!(r.path_cost(&"B").unwrap(), -1.0);
        assert_eq!(r.path_vertices(&"B").unwrap(), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_bellman_ford_negative_cycle() {
        let g = graph_with(&["A", "B"], &[("A", "B", 1.0), ("B", "A", -3.0)]);
        assert_eq!(bellman_ford(&g, &"A").unwrap_err(), GraphError::NegativeCycle);
    }

    #[test]
    fn test_bellman_ford_unreachable_negative_cycle() {
        let g = graph_with(
            &["A", "B", "C", "D"],
            &[("A", "B", 1.0), ("C", "D", 1.0), ("D", "C", -3.0)],
        );
        let r = bellman_ford(&g, &"A").unwrap();
        assert_eq!(r.path_cost(&"B").unwrap(), 1.0);
        assert!(!r.is_reachable(&"C").unwrap());
    }

    #[test]
    fn test_bellman_ford_negative_self_loop() {
        let g = graph_with(&["A"], &[("A", "A", -0.5)]);
        assert_eq!(bellman_ford(&g, &"A").unwrap_err(), GraphError::NegativeCycle);
    }

    #[test]
    fn test_bellman_ford_reverse_chain_uses_every_pass() {
        // Edges are relaxed in tail key order, so each pass extends the path
        // by one hop only.
        let g = graph_with(
            &["0", "1", "2", "3", "4", "5"],
            &[
                ("5", "4", -1.0),
                ("4", "3", -1.0),
                ("3", "2", -1.0),
                ("2", "1", -1.0),
                ("1", "0", -1.0),
            ],
        );
        let r = bellman_ford(&g, &"5").unwrap();
        assert_eq!(r.path_cost(&"0").unwrap(), -5.0);
        assert_eq!(r.path_vertices(&"0").unwrap(), vec!["5", "4", "3", "2", "1", "0"]);
    }

    #[test]
    fn test_bellman_ford_missing_source() {
        assert!(matches!(bellman_ford(&triangle(), &"Z"), Err(GraphError::OutOfRange(_))));
    }

    // --- Floyd-Warshall tests ---

    #[test]
    fn test_floyd_warshall_triangle() {
        let r = floyd_warshall(&triangle()).unwrap();
        assert_eq!(r.path_cost(&"A", &"C").unwrap(), 2.0);
        assert_eq!(r.path_vertices(&"A", &"C").unwrap(), vec!["A", "B", "C"]);
        assert_eq!(r.path_vertices(&"B", &"B").unwrap(), vec!["B"]);
        assert_eq!(r.path_cost(&"B", &"B").unwrap(), 0.0);
        assert!(r.path_vertices(&"C", &"A").unwrap().is_empty());
        assert!(!r.is_reachable(&"C", &"A").unwrap());
    }

    #[test]
    fn test_floyd_warshall_matches_dijkstra() {
        let g = towns();
        let all = floyd_warshall(&g).unwrap();
        for source in g.keys() {
            let one = dijkstra(&g, source).unwrap();
            for target in g.keys() {
                assert_close(
                    all.path_cost(source, target).unwrap(),
                    one.path_cost(target).unwrap(),
                );
            }
        }
    }

    #[test]
    fn test_floyd_warshall_parallel_edges_use_minimum() {
        let r = floyd_warshall(&towns()).unwrap();
        assert_close(r.path_cost(&"Kafa", &"Sele").unwrap(), 1.1);
        assert_eq!(r.successor(&"Kafa", &"Sele").unwrap(), Some(&"Sele"));
    }

    #[test]
    fn test_floyd_warshall_negative_edge() {
        let g = graph_with(
            &["A", "B", "C"],
            &[("A", "B", 4.0), ("A", "C", 1.0), ("C", "B", -2.0)],
        );
        let r = floyd_warshall(&g).unwrap();
        assert_eq!(r.path_cost(&"A", &"B").unwrap(), -1.0);
        assert_eq!(r.path_vertices(&"A", &"B").unwrap(), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_floyd_warshall_negative_cycle() {
        let g = graph_with(&["A", "B"], &[("A", "B", 1.0), ("B", "A", -3.0)]);
        assert_eq!(floyd_warshall(&g).unwrap_err(), GraphError::NegativeCycle);
    }

    #[test]
    fn test_floyd_warshall_negative_self_loop() {
        let g = graph_with(&["A", "B"], &[("B", "B", -1.0)]);
        assert_eq!(floyd_warshall(&g).unwrap_err(), GraphError::NegativeCycle);
    }

    #[test]
    fn test_floyd_warshall_zero_weight_cycle() {
        let g = graph_with(
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "A", 0.0), ("B", "C", 2.0)],
        );
        let r = floyd_warshall(&g).unwrap();
        assert_eq!(r.path_cost(&"A", &"C").unwrap(), 3.0);
        assert_eq!(r.path_vertices(&"A", &"C").unwrap(), vec!["A", "B", "C"]);
        assert_eq!(r.path_cost(&"A", &"A").unwrap(), 0.0);
    }

    #[test]
    fn test_floyd_warshall_empty_graph() {
        let g: Graph<&'static str, ()> = Graph::new();
        let r = floyd_warshall(&g).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_results_are_snapshots() {
        let mut g = triangle();
        let r = dijkstra(&g, &"A").unwrap();
        g.erase_vertex(&"B");
        g.insert_vertex("D", ()).unwrap();
        assert_eq!(r.path_cost(&"C").unwrap(), 2.0);
        assert!(matches!(r.path_cost(&"D"), Err(GraphError::OutOfRange(_))));
    }
}
