use std::time::Duration;

use indexmap::IndexMap;
use netbuilder_core::{Attributes, BuilderError, FieldValue};
use netbuilder_graph::{Graph, NodeId};

/// Error type for metric task execution.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("Task {task} failed: {reason}")]
    Failed { task: String, reason: String },
    #[error("Attribute query failed: {0}")]
    Source(String),
    #[error("Worker did not complete: {0}")]
    Join(String),
    #[error("Metrics did not complete within {0:?}")]
    TimedOut(Duration),
}

impl From<MetricError> for BuilderError {
    fn from(e: MetricError) -> Self {
        match e {
            MetricError::Source(_) => BuilderError::Source(e.to_string()),
            other => BuilderError::Metrics(other.to_string()),
        }
    }
}

/// Output of one metric task. Each task fills only its own keys.
#[derive(Debug, Clone, Default)]
pub struct PartialMetrics {
    pub per_node: IndexMap<NodeId, Attributes>,
    pub per_graph: Attributes,
}

impl PartialMetrics {
    pub fn set_node(&mut self, id: &str, key: &str, value: impl Into<FieldValue>) {
        self.per_node
            .entry(id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn set_graph(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.per_graph.insert(key.to_string(), value.into());
    }
}

/// A CPU-bound metric computed from a read-only graph snapshot.
///
/// Implementations wrap one algorithm (PageRank, degrees, ...) and run on a
/// blocking worker thread.
pub trait ComputeTask: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Compute the metric. Must not touch keys owned by other tasks.
    fn compute(&self, graph: &Graph) -> Result<PartialMetrics, MetricError>;
}
