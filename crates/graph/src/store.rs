use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use netbuilder_core::{Attributes, FieldValue};
use serde::Serialize;

/// Opaque external identifier (usually an IRI).
pub type NodeId = String;

/// Edge attribute read as the edge weight by weighted metrics.
pub const WEIGHT_KEY: &str = "weight";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub attributes: Attributes,
}

impl Edge {
    /// Numeric `weight` attribute, 1.0 when absent or non-numeric.
    pub fn weight(&self) -> f64 {
        self.attributes
            .get(WEIGHT_KEY)
            .and_then(FieldValue::as_f64)
            .unwrap_or(1.0)
    }
}

/// Directed simple graph keyed by external id.
///
/// Nodes and edges keep insertion order so that every traversal, and hence
/// every metric, is reproducible for identical input. At most one edge per
/// ordered `(source, target)` pair; self-loops are allowed. Any id referenced
/// by an edge is a node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: IndexMap<NodeId, Node>,
    pub edges: IndexMap<(NodeId, NodeId), Edge>,
    pub outgoing: IndexMap<NodeId, IndexSet<NodeId>>,
    pub incoming: IndexMap<NodeId, IndexSet<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node if absent and return it.
    pub fn add_node(&mut self, id: &str) -> &mut Node {
        if !self.nodes.contains_key(id) {
            self.outgoing.insert(id.to_string(), IndexSet::new());
            self.incoming.insert(id.to_string(), IndexSet::new());
        }
        self.nodes.entry(id.to_string()).or_insert_with(|| Node {
            id: id.to_string(),
            attributes: Attributes::new(),
        })
    }

    /// Insert the edge `source -> target` if absent (creating missing
    /// endpoints) and return it.
    pub fn add_edge(&mut self, source: &str, target: &str) -> &mut Edge {
        self.add_node(source);
        self.add_node(target);

        let key = (source.to_string(), target.to_string());
        if !self.edges.contains_key(&key) {
            if let Some(out) = self.outgoing.get_mut(source) {
                out.insert(target.to_string());
            }
            if let Some(inc) = self.incoming.get_mut(target) {
                inc.insert(source.to_string());
            }
        }
        self.edges.entry(key).or_insert_with(|| Edge {
            source: source.to_string(),
            target: target.to_string(),
            attributes: Attributes::new(),
        })
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.outgoing
            .get(source)
            .is_some_and(|out| out.contains(target))
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges.get(&(source.to_string(), target.to_string()))
    }

    /// Remove nodes and every edge incident to them, keeping the order of
    /// what remains.
    pub fn remove_nodes<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let doomed: HashSet<&NodeId> = ids
            .into_iter()
            .filter(|id| self.nodes.contains_key(id.as_str()))
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        self.nodes.retain(|id, _| !doomed.contains(id));
        self.edges
            .retain(|(s, t), _| !doomed.contains(s) && !doomed.contains(t));
        for adjacency in [&mut self.outgoing, &mut self.incoming] {
            adjacency.retain(|id, _| !doomed.contains(id));
            for neighbours in adjacency.values_mut() {
                neighbours.retain(|n| !doomed.contains(n));
            }
        }
        doomed.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing.get(id).map_or(0, |v| v.len())
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.incoming.get(id).map_or(0, |v| v.len())
    }

    /// Unweighted total degree. A self-loop counts twice.
    pub fn degree(&self, id: &str) -> usize {
        self.in_degree(id) + self.out_degree(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(g: &Graph) -> Vec<&str> {
        g.nodes.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn add_edge_creates_endpoints() {
        let mut g = Graph::new();
        g.add_node("a");
        g.add_edge("a", "b");

        assert_eq!(ids(&g), vec!["a", "b"]);
        assert!(g.has_edge("a", "b"));
        assert!(!g.has_edge("b", "a"));
        assert_eq!(g.out_degree("a"), 1);
        assert_eq!(g.in_degree("b"), 1);
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("a", "b");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree("a"), 1);
    }

    #[test]
    fn self_loop_counts_twice() {
        let mut g = Graph::new();
        g.add_edge("a", "a");
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.degree("a"), 2);
    }

    #[test]
    fn remove_nodes_drops_incident_edges() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("c", "a");

        let removed = g.remove_nodes(&["b".to_string()]);

        assert_eq!(removed, 1);
        assert_eq!(ids(&g), vec!["a", "c"]);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("c", "a"));
        assert_eq!(g.out_degree("a"), 0);
        assert_eq!(g.in_degree("c"), 0);
    }

    #[test]
    fn remove_unknown_node_is_noop() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        assert_eq!(g.remove_nodes(&["zzz".to_string()]), 0);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn edge_weight_defaults_to_one() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c")
            .attributes
            .insert(WEIGHT_KEY.into(), FieldValue::Integer(3));
        g.add_edge("c", "d")
            .attributes
            .insert(WEIGHT_KEY.into(), FieldValue::from("heavy"));

        assert!((g.edge("a", "b").unwrap().weight() - 1.0).abs() < f64::EPSILON);
        assert!((g.edge("b", "c").unwrap().weight() - 3.0).abs() < f64::EPSILON);
        assert!((g.edge("c", "d").unwrap().weight() - 1.0).abs() < f64::EPSILON);
    }
}
