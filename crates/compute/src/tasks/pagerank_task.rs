use std::time::Instant;

use netbuilder_core::config::BuilderConfig;
use netbuilder_graph::Graph;
use tracing::debug;

use crate::algorithms::pagerank::pagerank;
use crate::state::keys;
use crate::task::{ComputeTask, MetricError, PartialMetrics};

/// Wraps the PageRank algorithm as a metric task.
pub struct PageRankTask {
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl PageRankTask {
    pub fn new(damping: f64, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            damping,
            max_iterations,
            tolerance,
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(
            config.pagerank_damping,
            config.pagerank_max_iterations,
            config.pagerank_tolerance,
        )
    }
}

impl ComputeTask for PageRankTask {
    fn name(&self) -> &str {
        "pagerank"
    }

    fn compute(&self, graph: &Graph) -> Result<PartialMetrics, MetricError> {
        let start = Instant::now();
        let scores = pagerank(graph, self.damping, self.max_iterations, self.tolerance);

        let mut out = PartialMetrics::default();
        for (id, score) in &scores {
            out.set_node(id, keys::PAGERANK, *score);
        }

        debug!(
            "PageRank computed for {} nodes in {:.3}s",
            scores.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(out)
    }
}
