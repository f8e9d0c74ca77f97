//! Relationship endpoint diagnostic.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use graphsnap_core::{find_orphans, GraphAccumulator, SourceRecord};
use graphsnap_graph::queries::diagnostic::{fetch_id_sample, DEFAULT_SAMPLE_NODES, DEFAULT_SAMPLE_ROWS};
use graphsnap_graph::GraphClient;

use super::ConnectionArgs;

#[derive(Args)]
pub struct CheckIdsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Nodes to sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_NODES)]
    pub node_limit: u32,

    /// Rows to read
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub row_limit: u32,
}

pub async fn execute(args: CheckIdsArgs) -> Result<()> {
    let config = args.connection.graph_config()?;
    let client = GraphClient::connect(&config).await?;

    let records = fetch_id_sample(&client, args.node_limit, args.row_limit).await?;

    println!();
    println!("{}", "Checking node/edge ID matching".bold());
    println!("{}", "─".repeat(50));

    let mut acc = GraphAccumulator::new(false);
    for record in &records {
        print_record(&acc, record);
        acc.push(record);
    }

    let (nodes, edges) = acc.into_parts();
    let orphans = find_orphans(&nodes, &edges);

    println!();
    println!("{}", "Summary".bold());
    println!("{}", "─".repeat(50));
    println!("  Total nodes: {}", nodes.len().to_string().cyan());
    println!("  Total edges: {}", edges.len().to_string().cyan());

    for orphan in &orphans {
        println!(
            "  {} {} -[{}]-> {}",
            "Orphan edge:".red(),
            orphan.from,
            orphan.rel_type.yellow(),
            orphan.to
        );
    }

    println!();
    if orphans.is_empty() {
        println!("{}", "All edges connect to valid nodes".green().bold());
    } else {
        println!(
            "{}",
            format!("Found {} orphan edges (nodes not in result set)", orphans.len()).red().bold()
        );
    }

    Ok(())
}

/// Print one row. Endpoint warnings reflect the nodes seen so far, which
/// may include the row's own node.
fn print_record(seen: &GraphAccumulator, record: &SourceRecord) {
    if let Some(node) = &record.node {
        let group = node.labels.first().map(String::as_str).unwrap_or("Node");
        let name = ["title", "name"]
            .iter()
            .find_map(|key| node.properties.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("");
        println!("{} {} ({}) - \"{}\"", "Node:".bold(), node.id, group.cyan(), name);
    }

    if let Some(rel) = &record.relationship {
        println!("  {} {} -[{}]-> {}", "Edge:".dimmed(), rel.start, rel.rel_type.yellow(), rel.end);

        let known = |id: &str| seen.contains_node(id) || record.node.as_ref().is_some_and(|n| n.id == id);
        if !known(&rel.start) {
            println!("  {} From node {} not in nodes map", "warning:".yellow().bold(), rel.start);
        }
        if !known(&rel.end) {
            println!("  {} To node {} not in nodes map", "warning:".yellow().bold(), rel.end);
        }
    }
}
