//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use graphsnap_graph::GraphConfig;

pub mod check_ids;
pub mod serve;

/// Cached graph snapshots for browser visualizations
#[derive(Parser)]
#[command(name = "graphsnap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the graph snapshot endpoint
    Serve(serve::ServeArgs),

    /// Check that relationship endpoints match returned node IDs
    CheckIds(check_ids::CheckIdsArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::CheckIds(args) => check_ids::execute(args).await,
        }
    }
}

/// Neo4j connection flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Neo4j URI, e.g. neo4j+s://<id>.databases.neo4j.io
    #[arg(long, env = "NEO4J_URI")]
    pub uri: Option<String>,

    /// Neo4j username (NEO4J_USERNAME is also accepted)
    #[arg(long, env = "NEO4J_USER")]
    pub user: Option<String>,

    #[arg(long, env = "NEO4J_USERNAME", hide = true)]
    pub username: Option<String>,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name
    #[arg(long, env = "NEO4J_DATABASE", default_value = graphsnap_graph::client::DEFAULT_DATABASE)]
    pub database: String,
}

impl ConnectionArgs {
    /// Resolve into a connection config; missing credentials are an error.
    pub fn graph_config(&self) -> Result<GraphConfig> {
        let config = GraphConfig::from_parts(
            self.uri.clone(),
            self.user.clone().or_else(|| self.username.clone()),
            self.password.clone(),
            Some(self.database.clone()),
        )?;
        Ok(config)
    }
}
