pub mod assemble;
pub mod components;
pub mod densify;
pub mod store;
pub mod view;

pub use assemble::{edge_endpoints, node_stubs, GraphAssembler};
pub use densify::{densify, DensifyReport};
pub use store::{Edge, Graph, Node, NodeId, WEIGHT_KEY};
pub use view::GraphView;
