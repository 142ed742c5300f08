use netbuilder_core::Config;
use netbuilder_network::NetworkBuilder;

/// Shared, read-only server state. Each request builds its own network.
pub struct AppState {
    pub builder: NetworkBuilder,
    pub config: Config,
}
