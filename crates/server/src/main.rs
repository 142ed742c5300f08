use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use netbuilder_core::logging::init_tracing;
use netbuilder_core::{Config, QueryParams};
use netbuilder_network::NetworkBuilder;
use netbuilder_server::cli::{CliArgs, Command};
use netbuilder_server::{build_router, AppState};
use netbuilder_source::SparqlClient;
use tracing::info;

fn load_config() -> Config {
    netbuilder_core::config::load_dotenv();
    Config::from_env()
}

fn network_builder(config: &Config) -> anyhow::Result<NetworkBuilder> {
    let client = SparqlClient::new(&config.source).context("failed to build SPARQL client")?;
    Ok(NetworkBuilder::new(Arc::new(client), config.builder.clone()))
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let builder = network_builder(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState { builder, config });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn query(config: &Config, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let params: QueryParams = serde_json::from_str(&raw)
        .with_context(|| format!("invalid query parameters in {}", path.display()))?;

    let out = network_builder(config)?.query(&params).await?;
    println!("{}", out.into_body());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = load_config();
    config.log_summary();

    match args.command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Query { params } => query(&config, &params).await,
    }
}
