use indexmap::IndexMap;
use netbuilder_core::Attributes;
use netbuilder_graph::{Graph, NodeId};
use serde::Serialize;

use crate::task::PartialMetrics;

/// Metric keys written by the built-in tasks.
pub mod keys {
    pub const PAGERANK: &str = "pagerank";
    pub const IN_DEGREE: &str = "in_degree";
    pub const OUT_DEGREE: &str = "out_degree";
    pub const DEGREE: &str = "degree";
    pub const WEIGHTED_IN_DEGREE: &str = "weighted_in_degree";
    pub const WEIGHTED_OUT_DEGREE: &str = "weighted_out_degree";
    pub const WEIGHTED_DEGREE: &str = "weighted_degree";
    pub const DISTANCE: &str = "distance";

    pub const NUMBER_OF_NODES: &str = "number_of_nodes";
    pub const NUMBER_OF_EDGES: &str = "number_of_edges";
    pub const AVERAGE_DEGREE: &str = "average_degree";
    pub const NUMBER_CONNECTED_COMPONENTS: &str = "number_connected_components";
    pub const DIAMETER: &str = "diameter";
}

/// Merged output of all metric tasks for one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsResult {
    /// Node id to merged metric and attribute fields, in graph order.
    pub per_node: IndexMap<NodeId, Attributes>,
    /// Graph-level aggregates; empty for graphs without nodes or edges.
    pub per_graph: Attributes,
}

impl MetricsResult {
    /// Empty result with one slot per graph node.
    pub fn for_graph(graph: &Graph) -> Self {
        Self {
            per_node: graph
                .nodes
                .keys()
                .map(|id| (id.clone(), Attributes::new()))
                .collect(),
            per_graph: Attributes::new(),
        }
    }

    /// Merge one task's output. Fields for ids outside the graph are dropped.
    pub fn absorb(&mut self, partial: PartialMetrics) {
        for (id, fields) in partial.per_node {
            if let Some(slot) = self.per_node.get_mut(&id) {
                slot.extend(fields);
            }
        }
        self.per_graph.extend(partial.per_graph);
    }

    /// Copy the per-node fields onto the graph's node attributes.
    pub fn apply_to(&self, graph: &mut Graph) {
        for (id, fields) in &self.per_node {
            if let Some(node) = graph.nodes.get_mut(id) {
                node.attributes
                    .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
    }
}
