use indexmap::IndexMap;
use netbuilder_graph::{Graph, GraphView, NodeId};
use tracing::{debug, warn};

/// Compute PageRank scores using the iterative power method over directed,
/// unweighted edges.
///
/// The rank held by nodes without out-links is spread uniformly over all
/// nodes, so scores always sum to 1.0. Iteration stops once the L1 change
/// drops below `n * tolerance`. Scores are returned in graph order.
pub fn pagerank(
    graph: &Graph,
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
) -> IndexMap<NodeId, f64> {
    let view = GraphView::new(graph);
    let n = view.node_count;
    if n == 0 {
        return IndexMap::new();
    }

    let uniform = 1.0 / n as f64;
    let mut scores = vec![uniform; n];
    let dangling: Vec<usize> = (0..n).filter(|&i| view.out_degree(i) == 0).collect();

    let mut converged = false;
    for iteration in 0..max_iterations {
        let dangling_sum: f64 = dangling.iter().map(|&i| scores[i]).sum();
        let base = (1.0 - damping) * uniform + damping * dangling_sum * uniform;

        let mut next = vec![base; n];
        for (source, targets) in view.outgoing.iter().enumerate() {
            if targets.is_empty() {
                continue;
            }
            let share = damping * scores[source] / targets.len() as f64;
            for &t in targets {
                next[t] += share;
            }
        }

        // Check convergence (L1 norm)
        let diff: f64 = next.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
        scores = next;

        if diff < n as f64 * tolerance {
            debug!(iterations = iteration + 1, diff, "PageRank converged");
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(max_iterations, "PageRank stopped without convergence");
    }

    view.index_to_node
        .iter()
        .zip(scores)
        .map(|(&id, s)| (id.to_string(), s))
        .collect()
}
