use std::collections::VecDeque;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wgraph_core::Graph;

type BenchGraph = Graph<u64, ()>;

/// Floyd-Warshall is cubic; larger graphs skip it.
const FLOYD_WARSHALL_LIMIT: usize = 1_500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: wgraph-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  tree        Branching tree (deep paths)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  barbell     Two dense cliques connected by a thin bridge");
        println!("  dla         Diffusion-limited aggregation (organic branching)");
        println!();
        println!("Default node_count: 200000");
        println!("Set RUST_LOG=wgraph_core=debug for per-algorithm logging.");
        return;
    }

    println!("wgraph-bench");
    println!("============");
    println!();

    let generators: Vec<(&str, fn(u64) -> BenchGraph)> = match mode {
        "tree" => vec![("Branching tree", gen_tree)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        "dla" => vec![("DLA (organic branching)", gen_dla)],
        "all" => vec![
            ("Branching tree", gen_tree as fn(u64) -> BenchGraph),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        info!(generator = name, node_count, "benchmark start");
        let t = Instant::now();
        run_benchmark(name, generator, node_count);
        info!(generator = name, elapsed_ms = millis(t), "benchmark done");
    }
}

fn millis(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_benchmark(name: &str, generator: fn(u64) -> BenchGraph, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} vertices", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s, {} vertices, {} edges, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!();

    let t = Instant::now();
    match wgraph_core::breadth_first_search(&graph, &0, |_, _| {}) {
        Ok(stats) => println!(
            "{:<16} {:>10} visited {:>8} starts {:>10.1}ms",
            "breadth-first",
            stats.visited,
            stats.starts,
            millis(t)
        ),
        Err(e) => println!("{:<16} failed: {}", "breadth-first", e),
    }

    let t = Instant::now();
    match wgraph_core::depth_first_search(&graph, &0, |_, _| {}) {
        Ok(stats) => println!(
            "{:<16} {:>10} visited {:>8} starts {:>10.1}ms",
            "depth-first",
            stats.visited,
            stats.starts,
            millis(t)
        ),
        Err(e) => println!("{:<16} failed: {}", "depth-first", e),
    }

    // Shortest path: vertex 0 to the highest key
    let far = graph.keys().last().copied().unwrap_or(0);

    let t = Instant::now();
    match wgraph_core::dijkstra(&graph, &0) {
        Ok(result) => report_path("dijkstra", &result, far, t),
        Err(e) => println!("{:<16} failed: {}", "dijkstra", e),
    }

    let t = Instant::now();
    match wgraph_core::bellman_ford(&graph, &0) {
        Ok(result) => report_path("bellman-ford", &result, far, t),
        Err(e) => println!("{:<16} failed: {}", "bellman-ford", e),
    }

    if graph.vertex_count() <= FLOYD_WARSHALL_LIMIT {
        let t = Instant::now();
        match wgraph_core::floyd_warshall(&graph) {
            Ok(result) => println!(
                "{:<16} {:>10} pairs {:>21.1}ms",
                "floyd-warshall",
                result.len() * result.len(),
                millis(t)
            ),
            Err(e) => println!("{:<16} failed: {}", "floyd-warshall", e),
        }
    } else {
        println!(
            "{:<16} skipped (more than {} vertices)",
            "floyd-warshall", FLOYD_WARSHALL_LIMIT
        );
    }
    println!();
}

fn report_path(label: &str, result: &wgraph_core::OneToAll<u64>, far: u64, t: Instant) {
    let elapsed = millis(t);
    let hops = result
        .path_vertices(&far)
        .map(|p| p.len().saturating_sub(1))
        .unwrap_or(0);
    match result.path_cost(&far) {
        Ok(cost) if cost.is_finite() => println!(
            "{:<16} 0 → {}: cost {:.2} in {} hops {:>6.1}ms",
            label, far, cost, hops, elapsed
        ),
        _ => println!("{:<16} 0 → {}: no path {:>6.1}ms", label, far, elapsed),
    }
}

// ---------------------------------------------------------------------------
// Generators: O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Edge weight in [0.1, 10.0).
    fn weight(&mut self) -> f64 {
        0.1 + self.next_f64() * 9.9
    }
}

/// Insert vertices `0..count`.
fn with_vertices(count: u64, edge_hint: u64) -> BenchGraph {
    let mut graph = BenchGraph::with_capacity(edge_hint as usize);
    for id in 0..count {
        if let Err(e) = graph.insert_vertex(id, ()) {
            warn!(id, error = %e, "vertex not inserted");
        }
    }
    graph
}

fn link(graph: &mut BenchGraph, from: u64, to: u64, weight: f64) {
    if let Err(e) = graph.insert_edge(&from, &to, weight) {
        warn!(from, to, error = %e, "edge not inserted");
    }
}

/// Branching tree: each vertex spawns three children.
///
/// Produces deep paths (log depth) with exponential width. Tests deep
/// depth-first descent and path reconstruction.
fn gen_tree(node_count: u64) -> BenchGraph {
    let mut graph = with_vertices(node_count, node_count);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                let w = rng.weight();
                link(&mut graph, parent, child, w);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each vertex links to its K clockwise neighbors; each link is rewired
/// with probability p. High clustering with short path lengths.
fn gen_small_world(node_count: u64) -> BenchGraph {
    let k = 5u64;
    let p = 0.05f64;
    let mut graph = with_vertices(node_count, node_count * k);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            let w = rng.weight();
            link(&mut graph, i, target, w);
        }
    }

    graph
}

/// Erdos-Renyi: ~5 uniform random edges per vertex. Baseline topology with
/// no structure.
fn gen_random(node_count: u64) -> BenchGraph {
    let target_edges = node_count * 5;
    let mut graph = with_vertices(node_count, target_edges);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            let w = rng.weight();
            link(&mut graph, from, to, w);
        }
    }

    graph
}

/// Barbell: two dense clusters joined by a single chain of bridge vertices.
///
/// Every path between the clusters squeezes through the bridge.
fn gen_barbell(node_count: u64) -> BenchGraph {
    let bridge_len = 10u64;
    let cluster_size = node_count.saturating_sub(bridge_len) / 2;
    let total = cluster_size * 2 + bridge_len;
    let mut graph = with_vertices(total, cluster_size * 20 + bridge_len);
    let mut rng = FastRng::new(99999);

    let mut wire_cluster = |graph: &mut BenchGraph, offset: u64| {
        for i in 0..cluster_size {
            for _ in 0..10u64.min(cluster_size.saturating_sub(1)) {
                let target = rng.next(cluster_size);
                if target != i {
                    let w = rng.weight();
                    link(graph, offset + i, offset + target, w);
                }
            }
        }
    };

    wire_cluster(&mut graph, 0);
    let b_start = cluster_size + bridge_len;
    wire_cluster(&mut graph, b_start);

    // Bridge: chain from the last vertex of A through to the first of B.
    // With empty clusters the chain stops at the last bridge vertex.
    let bridge_end = b_start.min(total.saturating_sub(1));
    for id in cluster_size.saturating_sub(1)..bridge_end {
        link(&mut graph, id, id + 1, 1.0);
    }

    graph
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new vertex attaches to a random recent "surface" vertex, with
/// occasional long-range jumps. Edges point toward the seed, so most of
/// the graph is reached from vertex 0 only through restarts.
fn gen_dla(node_count: u64) -> BenchGraph {
    let mut graph = with_vertices(node_count, node_count * 2);
    let mut rng = FastRng::new(77777);

    let mut surface: VecDeque<u64> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        let w = rng.weight();
        link(&mut graph, new_node, attach_to, w);

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                let w = rng.weight();
                link(&mut graph, new_node, other, w);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barbell_bridge_stays_in_range() {
        // Too small for clusters: only the bridge chain remains
        let graph = gen_barbell(5);
        assert_eq!(graph.vertex_count(), 10);
        assert_eq!(graph.edge_count(), 9);
        assert_eq!(graph.outdegree(&9).unwrap(), 0);
    }

    #[test]
    fn test_barbell_bridge_joins_clusters() {
        let graph = gen_barbell(30);
        assert_eq!(graph.vertex_count(), 30);
        let r = wgraph_core::dijkstra(&graph, &9).unwrap();
        assert_eq!(r.path_cost(&20).unwrap(), 11.0);
    }

    #[test]
    fn test_generators_reach_target_size() {
        let generators: [fn(u64) -> BenchGraph; 4] = [gen_tree, gen_small_world, gen_random, gen_dla];
        for generator in generators {
            let graph = generator(500);
            assert_eq!(graph.vertex_count(), 500);
            assert!(graph.edge_count() > 0);
        }
    }
}
