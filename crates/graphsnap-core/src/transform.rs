//! Record to visualization transform.
//!
//! Rows are folded into two insertion-ordered maps keyed by identifier. A
//! repeated identifier replaces the earlier entry but keeps its position.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::label::node_label;
use crate::model::{GraphEdge, GraphNode, SourceNode, SourceRecord, SourceRelationship};
use crate::tooltip::build_tooltip;

/// Group used for nodes without any label.
pub const DEFAULT_GROUP: &str = "Node";

/// Computed node fields that source properties may not overwrite. `title`
/// is also reserved, but only while a tooltip is generated.
const RESERVED_KEYS: &[&str] = &["id", "label", "group"];

/// An edge whose endpoint is missing from the node set.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanEdge {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    pub rel_type: String,
    pub missing_from: bool,
    pub missing_to: bool,
}

/// Accumulates deduplicated nodes and edges from result rows.
#[derive(Debug, Default)]
pub struct GraphAccumulator {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<String, GraphEdge>,
    tooltips: bool,
}

impl GraphAccumulator {
    pub fn new(tooltips: bool) -> Self {
        Self {
            tooltips,
            ..Default::default()
        }
    }

    /// Fold one row into the maps. Absent fields are skipped.
    pub fn push(&mut self, record: &SourceRecord) {
        if let Some(node) = &record.node {
            self.push_node(node);
        }
        if let Some(neighbor) = &record.neighbor {
            self.push_node(neighbor);
        }
        if let Some(rel) = &record.relationship {
            self.push_relationship(rel);
        }
    }

    pub fn push_node(&mut self, node: &SourceNode) {
        let vis = node_to_vis(node, self.tooltips);
        self.nodes.insert(vis.id.clone(), vis);
    }

    pub fn push_relationship(&mut self, rel: &SourceRelationship) {
        let vis = rel_to_vis(rel);
        self.edges.insert(vis.id.clone(), vis);
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes and edges exactly as accumulated, orphans included.
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (
            self.nodes.into_values().collect(),
            self.edges.into_values().collect(),
        )
    }

    /// Nodes and edges with orphan edges removed. Also returns how many edges
    /// were dropped.
    pub fn into_pruned(self) -> (Vec<GraphNode>, Vec<GraphEdge>, usize) {
        let Self { nodes, edges, .. } = self;
        let total = edges.len();
        let edges: Vec<GraphEdge> = edges
            .into_values()
            .filter(|e| nodes.contains_key(&e.from) && nodes.contains_key(&e.to))
            .collect();
        let dropped = total - edges.len();
        (nodes.into_values().collect(), edges, dropped)
    }
}

/// Reshape a source node into a visualization node.
pub fn node_to_vis(node: &SourceNode, tooltips: bool) -> GraphNode {
    let group = node
        .labels
        .first()
        .filter(|l| !l.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_GROUP.to_string());
    let label = node_label(&node.properties, &group);
    let title = tooltips.then(|| build_tooltip(&label, &group, &node.properties));

    let properties: Map<String, Value> = node
        .properties
        .iter()
        .filter(|(key, value)| {
            let reserved = RESERVED_KEYS.contains(&key.as_str()) || (tooltips && key.as_str() == "title");
            !reserved && is_scalar(value)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    GraphNode {
        id: node.id.clone(),
        label,
        group,
        title,
        properties,
    }
}

/// Reshape a source relationship into a visualization edge.
pub fn rel_to_vis(rel: &SourceRelationship) -> GraphEdge {
    GraphEdge {
        id: rel.id.clone(),
        from: rel.start.clone(),
        to: rel.end.clone(),
        rel_type: rel.rel_type.clone(),
        label: rel.rel_type.clone(),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// List the edges whose endpoints are not in `nodes`.
pub fn find_orphans(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<OrphanEdge> {
    let ids: std::collections::HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    edges
        .iter()
        .filter_map(|e| {
            let missing_from = !ids.contains(e.from.as_str());
            let missing_to = !ids.contains(e.to.as_str());
            (missing_from || missing_to).then(|| OrphanEdge {
                edge_id: e.id.clone(),
                from: e.from.clone(),
                to: e.to.clone(),
                rel_type: e.rel_type.clone(),
                missing_from,
                missing_to,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rel(id: &str, from: &str, to: &str) -> SourceRelationship {
        SourceRelationship::new(id, from, to, "LINKS_TO")
    }

    #[test]
    fn test_node_defaults() {
        let vis = node_to_vis(&SourceNode::new("42"), false);
        assert_eq!(vis.id, "42");
        assert_eq!(vis.group, "Node");
        assert_eq!(vis.label, "Node");
        assert!(vis.title.is_none());
    }

    #[test]
    fn test_properties_spread_without_shadowing() {
        let node = SourceNode::new("1")
            .with_label("Post")
            .with_property("id", "external-id")
            .with_property("title", "Hello")
            .with_property("views", 10)
            .with_property("tags", json!(["a", "b"]));

        let vis = node_to_vis(&node, true);
        assert_eq!(vis.id, "1");
        assert_eq!(vis.label, "Hello");
        assert_eq!(vis.group, "Post");
        assert_eq!(vis.title.as_deref(), Some("Hello\nPost"));
        assert_eq!(vis.properties.get("views"), Some(&json!(10)));
        assert!(!vis.properties.contains_key("id"));
        assert!(!vis.properties.contains_key("tags"));
    }

    #[test]
    fn test_source_title_kept_without_tooltips() {
        let node = SourceNode::new("1")
            .with_label("Post")
            .with_property("title", "Hello");

        let with_tooltip = node_to_vis(&node, true);
        assert!(!with_tooltip.properties.contains_key("title"));

        let vis = node_to_vis(&node, false);
        assert!(vis.title.is_none());
        assert_eq!(vis.properties.get("title"), Some(&json!("Hello")));

        let value = serde_json::to_value(&vis).unwrap();
        assert_eq!(value["title"], "Hello");
    }

    #[test]
    fn test_edge_shape() {
        let edge = rel_to_vis(&rel("9", "1", "2"));
        assert_eq!(edge.from, "1");
        assert_eq!(edge.to, "2");
        assert_eq!(edge.rel_type, "LINKS_TO");
        assert_eq!(edge.label, "LINKS_TO");
    }

    #[test]
    fn test_dedup_keeps_first_position_last_value() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(&SourceRecord::node(SourceNode::new("a").with_property("name", "first")));
        acc.push(&SourceRecord::node(SourceNode::new("b")));
        acc.push(&SourceRecord::node(SourceNode::new("a").with_property("name", "second")));
        acc.push(&SourceRecord::node(SourceNode::new("b")).with_relationship(rel("r1", "a", "b")));
        acc.push(&SourceRecord::node(SourceNode::new("a")).with_relationship(rel("r1", "a", "b")));

        assert_eq!(acc.node_count(), 2);
        assert_eq!(acc.edge_count(), 1);

        let (nodes, edges) = acc.into_parts();
        assert_eq!(nodes[0].id, "a");
        assert_eq!(nodes[0].label, "Node");
        assert!(nodes[0].properties.is_empty());
        assert_eq!(nodes[1].id, "b");
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_zero_identifier_is_present() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(&SourceRecord::node(SourceNode::new("0")).with_relationship(rel("0", "0", "0")));
        assert!(acc.contains_node("0"));
        assert_eq!(acc.edge_count(), 1);
    }

    #[test]
    fn test_absent_fields_skipped() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(&SourceRecord::default());
        assert_eq!(acc.node_count(), 0);
        assert_eq!(acc.edge_count(), 0);
    }

    #[test]
    fn test_neighbor_is_collected() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(
            &SourceRecord::node(SourceNode::new("a"))
                .with_relationship(rel("r", "a", "b"))
                .with_neighbor(SourceNode::new("b")),
        );
        let (nodes, edges, dropped) = acc.into_pruned();
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 1);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_pruning_drops_orphans() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(&SourceRecord::node(SourceNode::new("a")).with_relationship(rel("r1", "a", "b")));
        acc.push(&SourceRecord::node(SourceNode::new("b")).with_relationship(rel("r2", "b", "outside")));

        let (nodes, edges, dropped) = acc.into_pruned();
        assert_eq!(nodes.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "r1");
        assert!(find_orphans(&nodes, &edges).is_empty());
    }

    #[test]
    fn test_find_orphans_reports_missing_side() {
        let mut acc = GraphAccumulator::new(false);
        acc.push(&SourceRecord::node(SourceNode::new("a")).with_relationship(rel("r1", "ghost", "a")));
        let (nodes, edges) = acc.into_parts();

        let orphans = find_orphans(&nodes, &edges);
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].missing_from);
        assert!(!orphans[0].missing_to);
    }
}
