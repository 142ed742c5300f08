use netbuilder_graph::Graph;

use crate::algorithms::graph_stats::graph_metrics;
use crate::state::keys;
use crate::task::{ComputeTask, MetricError, PartialMetrics};

/// Graph-level aggregates. Produces nothing for a graph without nodes or
/// edges.
pub struct GraphMetricsTask;

impl ComputeTask for GraphMetricsTask {
    fn name(&self) -> &str {
        "graph_metrics"
    }

    fn compute(&self, graph: &Graph) -> Result<PartialMetrics, MetricError> {
        let mut out = PartialMetrics::default();
        let Some(m) = graph_metrics(graph) else {
            return Ok(out);
        };
        out.set_graph(keys::NUMBER_OF_NODES, m.number_of_nodes as i64);
        out.set_graph(keys::NUMBER_OF_EDGES, m.number_of_edges as i64);
        out.set_graph(keys::AVERAGE_DEGREE, m.average_degree);
        out.set_graph(
            keys::NUMBER_CONNECTED_COMPONENTS,
            m.number_connected_components as i64,
        );
        out.set_graph(keys::DIAMETER, m.diameter as i64);
        Ok(out)
    }
}
