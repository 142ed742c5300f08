use netbuilder_graph::Graph;

use crate::algorithms::distance::ego_distances;
use crate::state::keys;
use crate::task::{ComputeTask, MetricError, PartialMetrics};

/// Hop distance from the nearest ego node. Unreachable nodes get no entry.
pub struct EgoDistanceTask {
    egos: Vec<String>,
}

impl EgoDistanceTask {
    pub fn new(egos: Vec<String>) -> Self {
        Self { egos }
    }
}

impl ComputeTask for EgoDistanceTask {
    fn name(&self) -> &str {
        "ego_distance"
    }

    fn compute(&self, graph: &Graph) -> Result<PartialMetrics, MetricError> {
        let mut out = PartialMetrics::default();
        for (id, hops) in ego_distances(graph, &self.egos) {
            out.set_node(&id, keys::DISTANCE, hops as i64);
        }
        Ok(out)
    }
}
