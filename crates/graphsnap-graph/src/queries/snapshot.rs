//! Bounded traversal queries, one per [`TraversalPolicy`].

use anyhow::Result;
use async_trait::async_trait;
use graphsnap_core::{GraphSource, SnapshotLimits, SourceRecord, TraversalPolicy};
use neo4rs::Query;
use tracing::debug;

use crate::client::{GraphClient, LazyGraphClient};
use crate::records::record_from_row;

/// Pick N nodes, then only the relationships between them. The `m IN nodes`
/// guard keeps every edge endpoint inside the selection.
const LIMIT_THEN_EXPAND: &str = "
    MATCH (n)
    WITH n LIMIT $nodeLimit
    WITH collect(n) AS nodes
    UNWIND nodes AS n
    OPTIONAL MATCH (n)-[r]-(m)
    WHERE m IN nodes
    RETURN n, r
    LIMIT $rowLimit";

/// Pick N nodes and expand all their relationships. Far ends may lie outside
/// the selection.
const DIRECT_EXPAND: &str = "
    MATCH (n)
    WITH n LIMIT $nodeLimit
    OPTIONAL MATCH (n)-[r]-(m)
    RETURN n, r
    LIMIT $rowLimit";

/// Only nodes that take part in a relationship.
const CONNECTED_ONLY: &str = "
    MATCH (n)-[r]-(m)
    RETURN n, r, m
    LIMIT $rowLimit";

/// The Cypher text for a policy.
pub fn cypher_for(policy: TraversalPolicy) -> &'static str {
    match policy {
        TraversalPolicy::LimitThenExpand => LIMIT_THEN_EXPAND,
        TraversalPolicy::DirectExpand => DIRECT_EXPAND,
        TraversalPolicy::ConnectedOnly => CONNECTED_ONLY,
    }
}

/// Build the parameterized query for a policy.
pub fn snapshot_query(policy: TraversalPolicy, limits: SnapshotLimits) -> Query {
    let query = Query::new(cypher_for(policy).to_string())
        .param("rowLimit", i64::from(limits.row_limit));

    if policy.applies_node_limit() {
        query.param("nodeLimit", i64::from(limits.node_limit))
    } else {
        query
    }
}

/// Run the traversal and convert every row.
pub async fn fetch_snapshot_records(
    client: &GraphClient,
    policy: TraversalPolicy,
    limits: SnapshotLimits,
) -> Result<Vec<SourceRecord>> {
    debug!(%policy, node_limit = limits.node_limit, row_limit = limits.row_limit, "Running snapshot traversal");
    let rows = client.query(snapshot_query(policy, limits)).await?;
    Ok(rows.iter().map(record_from_row).collect())
}

#[async_trait]
impl GraphSource for GraphClient {
    async fn fetch_records(
        &self,
        policy: TraversalPolicy,
        limits: SnapshotLimits,
    ) -> Result<Vec<SourceRecord>> {
        fetch_snapshot_records(self, policy, limits).await
    }
}

#[async_trait]
impl GraphSource for LazyGraphClient {
    async fn fetch_records(
        &self,
        policy: TraversalPolicy,
        limits: SnapshotLimits,
    ) -> Result<Vec<SourceRecord>> {
        let client = self.get().await?;
        fetch_snapshot_records(client, policy, limits).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_then_expand_guards_endpoints() {
        let cypher = cypher_for(TraversalPolicy::LimitThenExpand);
        assert!(cypher.contains("WHERE m IN nodes"));
        assert!(cypher.contains("$nodeLimit"));
        assert!(cypher.contains("$rowLimit"));
    }

    #[test]
    fn test_connected_only_has_no_node_limit() {
        let cypher = cypher_for(TraversalPolicy::ConnectedOnly);
        assert!(!cypher.contains("$nodeLimit"));
        assert!(cypher.contains("MATCH (n)-[r]-(m)"));
        assert!(!cypher.contains("OPTIONAL"));
    }

    #[test]
    fn test_expanding_policies_keep_isolated_nodes() {
        for policy in [TraversalPolicy::LimitThenExpand, TraversalPolicy::DirectExpand] {
            assert!(cypher_for(policy).contains("OPTIONAL MATCH (n)-[r]-(m)"));
        }
    }
}
