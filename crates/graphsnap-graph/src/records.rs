//! Conversion of neo4rs rows into driver-neutral snapshot records.

use graphsnap_core::{SourceNode, SourceRecord, SourceRelationship};
use neo4rs::{Node, Relation, Row};
use serde_json::{Map, Value};
use tracing::trace;

/// Column holding the anchor node.
pub const NODE_COLUMN: &str = "n";
/// Column holding the relationship, null for isolated nodes.
pub const REL_COLUMN: &str = "r";
/// Column holding the far end of the relationship, when the query returns it.
pub const NEIGHBOR_COLUMN: &str = "m";

/// Convert one result row. Columns that are missing, null or of an
/// unexpected type come back as `None`.
pub fn record_from_row(row: &Row) -> SourceRecord {
    SourceRecord {
        node: row_node(row, NODE_COLUMN).map(|n| source_node(&n)),
        relationship: row_relation(row, REL_COLUMN).map(|r| source_relationship(&r)),
        neighbor: row_node(row, NEIGHBOR_COLUMN).map(|n| source_node(&n)),
    }
}

fn row_node(row: &Row, column: &str) -> Option<Node> {
    row.get::<Option<Node>>(column).ok().flatten()
}

fn row_relation(row: &Row, column: &str) -> Option<Relation> {
    row.get::<Option<Relation>>(column).ok().flatten()
}

pub fn source_node(node: &Node) -> SourceNode {
    let mut properties = Map::new();
    for key in node.keys() {
        match node.get::<Value>(key) {
            Ok(value) => {
                properties.insert(key.to_string(), value);
            }
            Err(e) => trace!(key, error = ?e, "Skipping property without a JSON form"),
        }
    }

    SourceNode {
        id: node.id().to_string(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties,
    }
}

pub fn source_relationship(rel: &Relation) -> SourceRelationship {
    SourceRelationship {
        id: rel.id().to_string(),
        start: rel.start_node_id().to_string(),
        end: rel.end_node_id().to_string(),
        rel_type: rel.typ().to_string(),
    }
}
