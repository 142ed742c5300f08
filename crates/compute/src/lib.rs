pub mod algorithms;
pub mod engine;
pub mod state;
pub mod task;
pub mod tasks;

pub use algorithms::degree::DegreeInfo;
pub use algorithms::graph_stats::GraphMetrics;
pub use engine::MetricsEngine;
pub use state::{keys, MetricsResult};
pub use task::{ComputeTask, MetricError, PartialMetrics};
pub use tasks::{AttributeFetchTask, DegreeTask, EgoDistanceTask, GraphMetricsTask, PageRankTask};
