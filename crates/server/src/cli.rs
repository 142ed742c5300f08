use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build size-limited, analyzed networks from a SPARQL endpoint.
#[derive(Parser, Debug)]
#[command(name = "netbuilder", version, about = "Graph network builder")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve `/query` over HTTP.
    Serve {
        /// Bind address (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one query and print the result to stdout.
    Query {
        /// JSON file with the query parameters
        #[arg(long)]
        params: PathBuf,
    },
}
