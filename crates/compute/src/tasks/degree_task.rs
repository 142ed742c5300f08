use netbuilder_graph::Graph;

use crate::algorithms::degree::degree_centrality;
use crate::state::keys;
use crate::task::{ComputeTask, MetricError, PartialMetrics};

/// Plain and weighted in/out/total degree for every node.
pub struct DegreeTask;

impl ComputeTask for DegreeTask {
    fn name(&self) -> &str {
        "degree"
    }

    fn compute(&self, graph: &Graph) -> Result<PartialMetrics, MetricError> {
        let mut out = PartialMetrics::default();
        for (id, info) in degree_centrality(graph) {
            out.set_node(&id, keys::IN_DEGREE, info.in_deg as i64);
            out.set_node(&id, keys::OUT_DEGREE, info.out_deg as i64);
            out.set_node(&id, keys::DEGREE, info.total as i64);
            out.set_node(&id, keys::WEIGHTED_IN_DEGREE, info.weighted_in);
            out.set_node(&id, keys::WEIGHTED_OUT_DEGREE, info.weighted_out);
            out.set_node(&id, keys::WEIGHTED_DEGREE, info.weighted_total);
        }
        Ok(out)
    }
}
