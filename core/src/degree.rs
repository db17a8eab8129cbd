use std::fmt::Debug;

use crate::graph::Graph;
use crate::weight::Weight;

/// Degree information for a single vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeResult<K> {
    pub key: K,
    pub out_degree: usize,
    pub in_degree: usize,
    pub total_degree: usize,
}

/// Return vertices ranked by degree (total connections).
///
/// If `top_n` is 0, returns all vertices. Otherwise returns the top N by
/// total degree (descending). Ties are broken by key (ascending).
pub fn degree_centrality<K, D, W>(graph: &Graph<K, D, W>, top_n: usize) -> Vec<DegreeResult<K>>
where
    K: Ord + Clone + Debug,
    W: Weight,
{
    let mut results: Vec<DegreeResult<K>> = graph
        .slots()
        .into_iter()
        .map(|(key, vertex)| {
            let out_degree = vertex.outgoing.len();
            let in_degree = vertex.incoming.len();
            DegreeResult {
                key: key.clone(),
                out_degree,
                in_degree,
                total_degree: out_degree + in_degree,
            }
        })
        .collect();

    // Slots come out in key order and the sort is stable.
    results.sort_by(|a, b| b.total_degree.cmp(&a.total_degree));

    if top_n > 0 && top_n < results.len() {
        results.truncate(top_n);
    }

    results
}
