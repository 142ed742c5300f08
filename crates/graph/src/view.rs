//! Dense, index-based snapshot of a [`Graph`] for algorithm execution.

use std::collections::HashMap;

use crate::store::Graph;

/// Read-only adjacency view. Index `i` corresponds to the `i`-th node in
/// graph insertion order.
pub struct GraphView<'g> {
    pub node_count: usize,
    /// Dense index back to node id.
    pub index_to_node: Vec<&'g str>,
    /// Node id to dense index.
    pub node_to_index: HashMap<&'g str, usize>,
    /// Successor indices per node.
    pub outgoing: Vec<Vec<usize>>,
    /// Predecessor indices per node.
    pub incoming: Vec<Vec<usize>>,
    /// Neighbours ignoring direction, deduplicated, self excluded.
    pub undirected: Vec<Vec<usize>>,
}

impl<'g> GraphView<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let index_to_node: Vec<&str> = graph.nodes.keys().map(|k| k.as_str()).collect();
        let node_to_index: HashMap<&str, usize> = index_to_node
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let n = index_to_node.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut undirected: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (source, target) in graph.edges.keys() {
            let (Some(&s), Some(&t)) = (
                node_to_index.get(source.as_str()),
                node_to_index.get(target.as_str()),
            ) else {
                continue;
            };
            outgoing[s].push(t);
            incoming[t].push(s);
            if s != t {
                undirected[s].push(t);
                undirected[t].push(s);
            }
        }

        // Reciprocal pairs appear twice in the undirected projection.
        for neighbours in &mut undirected {
            neighbours.sort_unstable();
            neighbours.dedup();
        }

        Self {
            node_count: n,
            index_to_node,
            node_to_index,
            outgoing,
            incoming,
            undirected,
        }
    }

    pub fn out_degree(&self, idx: usize) -> usize {
        self.outgoing[idx].len()
    }

    pub fn in_degree(&self, idx: usize) -> usize {
        self.incoming[idx].len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_to_index.get(id).copied()
    }
}
