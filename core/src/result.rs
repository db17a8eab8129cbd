use std::fmt::Debug;

use crate::error::{GraphError, Result};
use crate::weight::Weight;

fn locate<K: Ord + Debug>(keys: &[K], key: &K) -> Result<usize> {
    keys.binary_search(key)
        .map_err(|_| GraphError::vertex_not_found(key))
}

/// Single-source shortest paths: distances and predecessors from one source.
///
/// A snapshot of the graph at computation time. Keys added afterwards are
/// unknown here and fail with `OutOfRange`.
#[derive(Debug, Clone)]
pub struct OneToAll<K, W = f64> {
    keys: Vec<K>,
    source: usize,
    distance: Vec<W>,
    previous: Vec<Option<usize>>,
}

impl<K, W> OneToAll<K, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    /// `keys` must be sorted; the other vectors are indexed in parallel.
    pub(crate) fn new(
        keys: Vec<K>,
        source: usize,
        distance: Vec<W>,
        previous: Vec<Option<usize>>,
    ) -> Self {
        Self {
            keys,
            source,
            distance,
            previous,
        }
    }

    pub fn source(&self) -> &K {
        &self.keys[self.source]
    }

    /// Every vertex tracked by this result, in key order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Total weight of the shortest path to `terminal`; `W::INFINITY` if
    /// `terminal` is unreachable.
    pub fn path_cost(&self, terminal: &K) -> Result<W> {
        locate(&self.keys, terminal).map(|t| self.distance[t])
    }

    pub fn is_reachable(&self, terminal: &K) -> Result<bool> {
        self.path_cost(terminal).map(|cost| cost.is_finite())
    }

    /// The vertex before `terminal` on its shortest path, if any.
    pub fn predecessor(&self, terminal: &K) -> Result<Option<&K>> {
        locate(&self.keys, terminal).map(|t| self.previous[t].map(|p| &self.keys[p]))
    }

    /// Vertices from the source to `terminal`, both included.
    ///
    /// `[source]` when `terminal` is the source, empty when it is
    /// unreachable.
    pub fn path_vertices(&self, terminal: &K) -> Result<Vec<K>> {
        let target = locate(&self.keys, terminal)?;
        if target == self.source {
            return Ok(vec![self.keys[target].clone()]);
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.previous[current] {
            path.push(parent);
            current = parent;
            if current == self.source || path.len() > self.keys.len() {
                break;
            }
        }
        if current != self.source {
            return Ok(Vec::new());
        }

        path.reverse();
        Ok(path.into_iter().map(|i| self.keys[i].clone()).collect())
    }
}

/// All-pairs shortest paths: a distance and a successor for every ordered
/// pair of vertices.
#[derive(Debug, Clone)]
pub struct AllToAll<K, W = f64> {
    keys: Vec<K>,
    /// Row-major `n × n`.
    distance: Vec<W>,
    /// `successor[i][j]`: the vertex after `i` on the path to `j`.
    successor: Vec<Option<usize>>,
}

impl<K, W> AllToAll<K, W>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    pub(crate) fn new(keys: Vec<K>, distance: Vec<W>, successor: Vec<Option<usize>>) -> Self {
        Self {
            keys,
            distance,
            successor,
        }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn cell(&self, initial: &K, terminal: &K) -> Result<(usize, usize)> {
        Ok((locate(&self.keys, initial)?, locate(&self.keys, terminal)?))
    }

    pub fn path_cost(&self, initial: &K, terminal: &K) -> Result<W> {
        let (i, j) = self.cell(initial, terminal)?;
        Ok(self.distance[i * self.len() + j])
    }

    pub fn is_reachable(&self, initial: &K, terminal: &K) -> Result<bool> {
        self.path_cost(initial, terminal).map(|cost| cost.is_finite())
    }

    /// The vertex after `initial` on the shortest path to `terminal`.
    pub fn successor(&self, initial: &K, terminal: &K) -> Result<Option<&K>> {
        let (i, j) = self.cell(initial, terminal)?;
        Ok(self.successor[i * self.len() + j].map(|s| &self.keys[s]))
    }

    /// Vertices from `initial` to `terminal`, both included; empty when no
    /// path exists.
    pub fn path_vertices(&self, initial: &K, terminal: &K) -> Result<Vec<K>> {
        let (i, j) = self.cell(initial, terminal)?;
        let n = self.len();

        let mut path = vec![i];
        let mut current = i;
        while current != j {
            match self.successor[current * n + j] {
                Some(next) if path.len() <= n => {
                    path.push(next);
                    current = next;
                }
                _ => return Ok(Vec::new()),
            }
        }

        Ok(path.into_iter().map(|v| self.keys[v].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A(0) → B(1) → C(2), D(3) unreachable
    fn chain_result() -> OneToAll<char> {
        OneToAll::new(
            vec!['A', 'B', 'C', 'D'],
            0,
            vec![0.0, 1.0, 3.0, f64::INFINITY],
            vec![None, Some(0), Some(1), None],
        )
    }

    #[test]
    fn test_one_to_all_queries() {
        let r = chain_result();
        assert_eq!(*r.source(), 'A');
        assert_eq!(r.path_cost(&'C').unwrap(), 3.0);
        assert_eq!(r.predecessor(&'C').unwrap(), Some(&'B'));
        assert_eq!(r.predecessor(&'A').unwrap(), None);
        assert!(r.is_reachable(&'B').unwrap());
        assert!(!r.is_reachable(&'D').unwrap());
    }

    #[test]
    fn test_one_to_all_paths() {
        let r = chain_result();
        assert_eq!(r.path_vertices(&'C').unwrap(), vec!['A', 'B', 'C']);
        assert_eq!(r.path_vertices(&'A').unwrap(), vec!['A']);
        assert!(r.path_vertices(&'D').unwrap().is_empty());
    }

    #[test]
    fn test_one_to_all_unknown_terminal() {
        let r = chain_result();
        assert!(matches!(r.path_cost(&'Z'), Err(GraphError::OutOfRange(_))));
        assert!(matches!(r.path_vertices(&'Z'), Err(GraphError::OutOfRange(_))));
    }

    // A ⇄ B → C
    fn pair_result() -> AllToAll<char> {
        let inf = f64::INFINITY;
        AllToAll::new(
            vec!['A', 'B', 'C'],
            vec![0.0, 1.0, 3.0, 4.0, 0.0, 2.0, inf, inf, 0.0],
            vec![
                Some(0), Some(1), Some(1),
                Some(0), Some(1), Some(2),
                None, None, Some(2),
            ],
        )
    }

    #[test]
    fn test_all_to_all_queries() {
        let r = pair_result();
        assert_eq!(r.len(), 3);
        assert_eq!(r.path_cost(&'A', &'C').unwrap(), 3.0);
        assert_eq!(r.successor(&'A', &'C').unwrap(), Some(&'B'));
        assert!(!r.is_reachable(&'C', &'A').unwrap());
        assert!(matches!(r.path_cost(&'A', &'Z'), Err(GraphError::OutOfRange(_))));
    }

    #[test]
    fn test_all_to_all_paths() {
        let r = pair_result();
        assert_eq!(r.path_vertices(&'A', &'C').unwrap(), vec!['A', 'B', 'C']);
        assert_eq!(r.path_vertices(&'B', &'A').unwrap(), vec!['B', 'A']);
        assert_eq!(r.path_vertices(&'C', &'C').unwrap(), vec!['C']);
        assert!(r.path_vertices(&'C', &'B').unwrap().is_empty());
    }
}
