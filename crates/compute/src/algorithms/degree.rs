use indexmap::IndexMap;
use netbuilder_graph::{Graph, NodeId};
use serde::Serialize;

/// Degree information for a single node, plain and weight-aware.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DegreeInfo {
    pub in_deg: usize,
    pub out_deg: usize,
    pub total: usize,
    pub weighted_in: f64,
    pub weighted_out: f64,
    pub weighted_total: f64,
}

/// Compute in-degree, out-degree, and total degree for every node, both
/// unweighted and summed over the edges' `weight` attribute (default 1.0).
/// A self-loop contributes to both in- and out-degree.
pub fn degree_centrality(graph: &Graph) -> IndexMap<NodeId, DegreeInfo> {
    let mut degrees: IndexMap<NodeId, DegreeInfo> = graph
        .nodes
        .keys()
        .map(|id| (id.clone(), DegreeInfo::default()))
        .collect();

    for edge in graph.edges.values() {
        let w = edge.weight();
        if let Some(d) = degrees.get_mut(edge.source.as_str()) {
            d.out_deg += 1;
            d.weighted_out += w;
        }
        if let Some(d) = degrees.get_mut(edge.target.as_str()) {
            d.in_deg += 1;
            d.weighted_in += w;
        }
    }

    for d in degrees.values_mut() {
        d.total = d.in_deg + d.out_deg;
        d.weighted_total = d.weighted_in + d.weighted_out;
    }
    degrees
}
