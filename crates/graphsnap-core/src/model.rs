//! Input records and output payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node as read from the database, before any reshaping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceNode {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Map<String, Value>,
}

impl SourceNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A relationship as read from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRelationship {
    pub id: String,
    pub start: String,
    pub end: String,
    pub rel_type: String,
}

impl SourceRelationship {
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            rel_type: rel_type.into(),
        }
    }
}

/// One result row. Any field may be absent (e.g. from an `OPTIONAL MATCH`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRecord {
    pub node: Option<SourceNode>,
    pub relationship: Option<SourceRelationship>,
    pub neighbor: Option<SourceNode>,
}

impl SourceRecord {
    pub fn node(node: SourceNode) -> Self {
        Self {
            node: Some(node),
            ..Default::default()
        }
    }

    pub fn with_relationship(mut self, rel: SourceRelationship) -> Self {
        self.relationship = Some(rel);
        self
    }

    pub fn with_neighbor(mut self, node: SourceNode) -> Self {
        self.neighbor = Some(node);
        self
    }
}

/// A visualization node.
///
/// Scalar properties of the source node are flattened next to the computed
/// fields; a property can never shadow `id`, `label`, `group` or `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// A visualization edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub label: String,
}

/// Limits echoed back to the client. `node_limit` is absent when the
/// traversal never bound it (connected-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_limit: Option<u32>,
    pub row_limit: u32,
}

/// The JSON document served by the graph endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub generated_at: String,
    pub limits: AppliedLimits,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_serializes_flat() {
        let mut properties = Map::new();
        properties.insert("year".to_string(), json!(2024));
        let node = GraphNode {
            id: "7".to_string(),
            label: "Rust".to_string(),
            group: "Topic".to_string(),
            title: None,
            properties,
        };

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"id": "7", "label": "Rust", "group": "Topic", "year": 2024}));
    }

    #[test]
    fn test_payload_uses_camel_case() {
        let payload = SnapshotPayload {
            generated_at: "2024-01-01T00:00:00.000Z".to_string(),
            limits: AppliedLimits { node_limit: Some(2), row_limit: 10 },
            nodes: vec![],
            edges: vec![GraphEdge {
                id: "1".to_string(),
                from: "a".to_string(),
                to: "b".to_string(),
                rel_type: "LINKS".to_string(),
                label: "LINKS".to_string(),
            }],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["generatedAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["limits"]["nodeLimit"], 2);
        assert_eq!(value["limits"]["rowLimit"], 10);
        assert_eq!(value["edges"][0]["type"], "LINKS");
    }

    #[test]
    fn test_unbound_node_limit_is_omitted() {
        let limits = AppliedLimits { node_limit: None, row_limit: 1200 };
        assert_eq!(serde_json::to_value(limits).unwrap(), json!({"rowLimit": 1200}));
    }
}
