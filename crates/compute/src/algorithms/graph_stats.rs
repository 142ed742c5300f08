use std::collections::VecDeque;

use netbuilder_graph::components::component_indices;
use netbuilder_graph::{Graph, GraphView};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Whole-graph structural aggregates.
///
/// Components and diameter use the undirected projection; the diameter is
/// that of the largest connected component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub number_of_nodes: usize,
    pub number_of_edges: usize,
    /// `2E / N`.
    pub average_degree: f64,
    pub number_connected_components: usize,
    pub diameter: usize,
}

/// Compute aggregates, or `None` when the graph has no nodes or no edges
/// (the diameter is undefined there).
pub fn graph_metrics(graph: &Graph) -> Option<GraphMetrics> {
    let total_nodes = graph.node_count();
    let total_edges = graph.edge_count();
    if total_nodes == 0 || total_edges == 0 {
        return None;
    }

    let view = GraphView::new(graph);
    let components = component_indices(&view);
    // Components come largest first; ties keep first-seen order.
    let largest = components.first()?;

    Some(GraphMetrics {
        number_of_nodes: total_nodes,
        number_of_edges: total_edges,
        average_degree: 2.0 * total_edges as f64 / total_nodes as f64,
        number_connected_components: components.len(),
        diameter: diameter(&view, largest),
    })
}

/// Longest shortest path inside one connected component, via a
/// breadth-first search from every member (run in parallel).
fn diameter(view: &GraphView, component: &[usize]) -> usize {
    component
        .par_iter()
        .map(|&start| eccentricity(view, start))
        .max()
        .unwrap_or(0)
}

fn eccentricity(view: &GraphView, start: usize) -> usize {
    let mut dist: Vec<Option<usize>> = vec![None; view.node_count];
    dist[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    let mut furthest = 0;

    while let Some(node) = queue.pop_front() {
        let d = dist[node].unwrap_or_default();
        furthest = furthest.max(d);
        for &nbr in &view.undirected[node] {
            if dist[nbr].is_none() {
                dist[nbr] = Some(d + 1);
                queue.push_back(nbr);
            }
        }
    }
    furthest
}
