use std::collections::VecDeque;

use indexmap::IndexMap;
use netbuilder_graph::{Graph, GraphView, NodeId};
use tracing::debug;

/// Hop distance from the ego node(s) to every reachable node, ignoring edge
/// direction and weights.
///
/// With several egos the distance is to the nearest one. Egos missing from
/// the graph are skipped; unreachable nodes get no entry. Results are
/// ordered by discovery.
pub fn ego_distances(graph: &Graph, egos: &[String]) -> IndexMap<NodeId, usize> {
    let view = GraphView::new(graph);
    let mut dist: Vec<Option<usize>> = vec![None; view.node_count];
    let mut queue = VecDeque::new();
    let mut order = Vec::new();

    for ego in egos {
        match view.index_of(ego) {
            Some(i) if dist[i].is_none() => {
                dist[i] = Some(0);
                queue.push_back(i);
                order.push(i);
            }
            Some(_) => {}
            None => debug!(ego = %ego, "ego node not in graph, check the queries"),
        }
    }

    while let Some(node) = queue.pop_front() {
        let next = dist[node].unwrap_or_default() + 1;
        for &nbr in &view.undirected[node] {
            if dist[nbr].is_none() {
                dist[nbr] = Some(next);
                queue.push_back(nbr);
                order.push(nbr);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|i| dist[i].map(|d| (view.index_to_node[i].to_string(), d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn distances_ignore_direction() {
        let mut g = Graph::new();
        g.add_edge("b", "ego");
        g.add_edge("c", "b");
        g.add_edge("ego", "d");
        g.add_node("island");

        let d = ego_distances(&g, &ids(&["ego"]));

        assert_eq!(d["ego"], 0);
        assert_eq!(d["b"], 1);
        assert_eq!(d["d"], 1);
        assert_eq!(d["c"], 2);
        assert!(!d.contains_key("island"));
    }

    #[test]
    fn multiple_egos_use_nearest() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("c", "d");

        let d = ego_distances(&g, &ids(&["a", "d"]));
        assert_eq!(d["b"], 1);
        assert_eq!(d["c"], 1);
        assert_eq!(d["d"], 0);
    }

    #[test]
    fn missing_ego_yields_nothing() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        assert!(ego_distances(&g, &ids(&["ghost"])).is_empty());
    }
}
