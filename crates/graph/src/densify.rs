//! Size reduction toward a node budget without breaking macro-structure.
//!
//! Two phases run in order: whole weakly-connected components are kept
//! largest first until the budget is reached, then the lowest-degree nodes
//! are trimmed in bounded batches. The result can stay above the budget:
//! a single component larger than the budget is never split by the first
//! phase, and the second phase stops after a fixed number of rounds.

use serde::Serialize;
use tracing::debug;

use crate::components::component_indices;
use crate::store::{Graph, NodeId};
use crate::view::GraphView;

/// What a densification pass removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DensifyReport {
    pub components_dropped: usize,
    pub nodes_dropped_with_components: usize,
    pub trim_rounds: usize,
    pub nodes_trimmed: usize,
}

/// Run both phases against `graph` in place.
pub fn densify(graph: &mut Graph, limit: usize, max_trim_rounds: usize) -> DensifyReport {
    let (components_dropped, nodes_dropped_with_components) = filter_components(graph, limit);
    let (trim_rounds, nodes_trimmed) = trim_low_degree(graph, limit, max_trim_rounds);

    let report = DensifyReport {
        components_dropped,
        nodes_dropped_with_components,
        trim_rounds,
        nodes_trimmed,
    };
    debug!(
        limit,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ?report,
        "densified graph"
    );
    report
}

/// Keep components largest first while the running total is below `limit`;
/// drop every later component whole. Returns `(components, nodes)` dropped.
pub fn filter_components(graph: &mut Graph, limit: usize) -> (usize, usize) {
    let (doomed, dropped_components) = {
        let view = GraphView::new(graph);
        let mut kept = 0usize;
        let mut dropped_components = 0usize;
        let mut doomed: Vec<NodeId> = Vec::new();

        for component in component_indices(&view) {
            if kept < limit {
                kept += component.len();
            } else {
                dropped_components += 1;
                doomed.extend(component.into_iter().map(|i| view.index_to_node[i].to_string()));
            }
        }
        (doomed, dropped_components)
    };

    let removed = graph.remove_nodes(&doomed);
    (dropped_components, removed)
}

/// Remove the lowest-degree nodes while the graph exceeds `limit`, at most
/// `min(excess, limit)` nodes per round and at most `max_rounds` rounds.
/// Returns `(rounds, nodes)`.
pub fn trim_low_degree(graph: &mut Graph, limit: usize, max_rounds: usize) -> (usize, usize) {
    let mut rounds = 0;
    let mut removed = 0;

    while graph.node_count() > limit && rounds < max_rounds {
        let excess = graph.node_count() - limit;
        let batch = excess.min(limit);

        let mut by_degree: Vec<(usize, &NodeId)> = graph
            .nodes
            .keys()
            .map(|id| (graph.degree(id), id))
            .collect();
        // Stable: equal degrees are removed in graph order.
        by_degree.sort_by_key(|(deg, _)| *deg);

        let victims: Vec<NodeId> = by_degree
            .into_iter()
            .take(batch)
            .map(|(_, id)| id.clone())
            .collect();

        rounds += 1;
        let n = graph.remove_nodes(&victims);
        removed += n;
        debug!(round = rounds, removed = n, remaining = graph.node_count(), "degree trim");
        if n == 0 {
            break;
        }
    }

    (rounds, removed)
}
