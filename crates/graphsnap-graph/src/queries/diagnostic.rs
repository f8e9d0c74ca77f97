//! Ad-hoc sample used to check that edge endpoints match node identifiers.

use anyhow::Result;
use graphsnap_core::SourceRecord;
use neo4rs::Query;

use crate::client::GraphClient;
use crate::records::record_from_row;

pub const DEFAULT_SAMPLE_NODES: u32 = 5;
pub const DEFAULT_SAMPLE_ROWS: u32 = 10;

const ID_SAMPLE: &str = "
    MATCH (n)
    WITH n LIMIT $nodeLimit
    OPTIONAL MATCH (n)-[r]->()
    RETURN n, r
    LIMIT $rowLimit";

/// Fetch a small sample of nodes with their outgoing relationships.
///
/// Unlike the snapshot traversal, relationship targets are not restricted to
/// the sampled nodes, so the sample can contain orphan edges.
pub async fn fetch_id_sample(client: &GraphClient, node_limit: u32, row_limit: u32) -> Result<Vec<SourceRecord>> {
    let query = Query::new(ID_SAMPLE.to_string())
        .param("nodeLimit", i64::from(node_limit))
        .param("rowLimit", i64::from(row_limit));

    let rows = client.query(query).await?;
    Ok(rows.iter().map(record_from_row).collect())
}
