//! Network query pipeline: seed-driven or sampled growth, graph assembly,
//! densification, concurrent metrics and result encoding.

pub mod builder;
pub mod format;
pub mod grower;

pub use builder::{Network, NetworkBuilder};
pub use format::{render, to_cytoscape, to_graphml, QueryOutput};
pub use grower::{Growth, NetworkGrower};
