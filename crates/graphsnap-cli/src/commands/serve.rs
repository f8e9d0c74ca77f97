//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use graphsnap_core::config::{DEFAULT_CACHE_SECONDS, DEFAULT_NODE_LIMIT, DEFAULT_ROW_LIMIT};
use graphsnap_core::{SnapshotLimits, SnapshotService, SnapshotSettings, TraversalPolicy};
use graphsnap_graph::LazyGraphClient;

use super::ConnectionArgs;

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Maximum nodes selected before expanding relationships (capped at 300)
    #[arg(long, env = "NODE_LIMIT", default_value_t = DEFAULT_NODE_LIMIT)]
    pub node_limit: u32,

    /// Maximum result rows (capped at 2000)
    #[arg(long, env = "ROW_LIMIT", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: u32,

    /// Seconds a snapshot is served from cache (at least 30)
    #[arg(long, env = "CACHE_SECONDS", default_value_t = DEFAULT_CACHE_SECONDS)]
    pub cache_seconds: u64,

    /// Traversal policy: limit-then-expand, direct-expand or connected-only
    #[arg(long, env = "TRAVERSAL_POLICY", default_value = "limit-then-expand")]
    pub policy: TraversalPolicy,

    /// Omit the hover tooltip (`title`) from nodes
    #[arg(long, env = "GRAPH_NO_TOOLTIPS")]
    pub no_tooltips: bool,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "graphsnap.log")]
    pub log_file: PathBuf,
}

impl ServeArgs {
    pub fn settings(&self) -> SnapshotSettings {
        SnapshotSettings::new(
            SnapshotLimits::new(self.node_limit, self.row_limit),
            self.policy,
            self.cache_seconds,
        )
        .with_tooltips(!self.no_tooltips)
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let graph_config = args.connection.graph_config()?;
    let settings = args.settings();
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    info!(
        node_limit = settings.limits.node_limit,
        row_limit = settings.limits.row_limit,
        ttl_seconds = settings.ttl_seconds(),
        policy = %settings.policy,
        isolated_nodes = settings.policy.includes_isolated_nodes(),
        tooltips = settings.tooltips,
        database = %graph_config.database,
        "Snapshot settings"
    );

    let source = Arc::new(LazyGraphClient::new(graph_config));
    let service = Arc::new(SnapshotService::new(settings, source));

    println!();
    println!("  {} {}", "graphsnap".cyan().bold(), "Graph Endpoint".bold());
    println!();
    println!("  {}  http://{}/graph", "Snapshot".green(), addr);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    graphsnap_web::run_server(service, addr).await?;

    Ok(())
}
