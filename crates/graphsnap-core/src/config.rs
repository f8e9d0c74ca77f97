//! Snapshot settings: query limits, cache TTL and traversal policy.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SnapshotError;

pub const DEFAULT_NODE_LIMIT: u32 = 200;
pub const MAX_NODE_LIMIT: u32 = 300;
pub const DEFAULT_ROW_LIMIT: u32 = 1200;
pub const MAX_ROW_LIMIT: u32 = 2000;
pub const DEFAULT_CACHE_SECONDS: u64 = 300;
pub const MIN_CACHE_SECONDS: u64 = 30;

/// Bounds applied to the traversal query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLimits {
    pub node_limit: u32,
    pub row_limit: u32,
}

impl SnapshotLimits {
    /// Clamp requested limits into `1..=MAX`.
    pub fn new(node_limit: u32, row_limit: u32) -> Self {
        Self {
            node_limit: node_limit.clamp(1, MAX_NODE_LIMIT),
            row_limit: row_limit.clamp(1, MAX_ROW_LIMIT),
        }
    }
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_LIMIT, DEFAULT_ROW_LIMIT)
    }
}

/// Shape of the traversal query.
///
/// The policies differ in what the snapshot can contain:
///
/// - `LimitThenExpand` selects up to `node_limit` nodes and only the
///   relationships between them. Isolated nodes are kept.
/// - `DirectExpand` selects up to `node_limit` nodes and expands every
///   relationship around them. Isolated nodes are kept; edges to nodes outside
///   the selection are pruned by the transform.
/// - `ConnectedOnly` matches relationship patterns directly. Isolated nodes
///   never appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalPolicy {
    #[default]
    LimitThenExpand,
    DirectExpand,
    ConnectedOnly,
}

impl TraversalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LimitThenExpand => "limit-then-expand",
            Self::DirectExpand => "direct-expand",
            Self::ConnectedOnly => "connected-only",
        }
    }

    /// Whether nodes without any relationship can appear in the result.
    pub fn includes_isolated_nodes(&self) -> bool {
        !matches!(self, Self::ConnectedOnly)
    }

    /// Whether the query selects at most `node_limit` anchor nodes.
    /// Connected-only traversal is bounded by the row limit alone.
    pub fn applies_node_limit(&self) -> bool {
        !matches!(self, Self::ConnectedOnly)
    }
}

impl fmt::Display for TraversalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalPolicy {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "limit-then-expand" => Ok(Self::LimitThenExpand),
            "direct-expand" => Ok(Self::DirectExpand),
            "connected-only" => Ok(Self::ConnectedOnly),
            other => Err(SnapshotError::config(format!(
                "unknown traversal policy '{}' (expected limit-then-expand, direct-expand or connected-only)",
                other
            ))),
        }
    }
}

/// Everything the snapshot service needs besides its graph source.
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    pub limits: SnapshotLimits,
    pub policy: TraversalPolicy,
    pub cache_ttl: Duration,
    pub tooltips: bool,
}

impl SnapshotSettings {
    pub fn new(limits: SnapshotLimits, policy: TraversalPolicy, cache_seconds: u64) -> Self {
        Self {
            limits,
            policy,
            cache_ttl: Duration::from_secs(cache_seconds.max(MIN_CACHE_SECONDS)),
            tooltips: true,
        }
    }

    pub fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips = enabled;
        self
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.cache_ttl.as_secs()
    }
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self::new(
            SnapshotLimits::default(),
            TraversalPolicy::default(),
            DEFAULT_CACHE_SECONDS,
        )
    }
}
