mod attribute_task;
mod degree_task;
mod distance_task;
mod graph_metrics_task;
mod pagerank_task;

pub use attribute_task::AttributeFetchTask;
pub use degree_task::DegreeTask;
pub use distance_task::EgoDistanceTask;
pub use graph_metrics_task::GraphMetricsTask;
pub use pagerank_task::PageRankTask;
