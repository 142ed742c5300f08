pub mod degree;
pub mod distance;
pub mod graph_stats;
pub mod pagerank;
