//! Graph snapshot service: fetch, transform, cache.

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::SnapshotCache;
use crate::config::SnapshotSettings;
use crate::error::SnapshotResult;
use crate::model::{AppliedLimits, SnapshotPayload};
use crate::source::GraphSource;
use crate::transform::GraphAccumulator;

/// A serialized snapshot ready to be written to a response.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub body: Arc<str>,
    pub cache_hit: bool,
}

/// Serves graph snapshots, querying the source only when the cache is stale.
pub struct SnapshotService {
    settings: SnapshotSettings,
    source: Arc<dyn GraphSource>,
    cache: SnapshotCache,
    refresh: Mutex<()>,
}

impl SnapshotService {
    pub fn new(settings: SnapshotSettings, source: Arc<dyn GraphSource>) -> Self {
        Self {
            settings,
            source,
            cache: SnapshotCache::new(),
            refresh: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &SnapshotSettings {
        &self.settings
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Current snapshot, served from cache while fresh.
    pub async fn snapshot(&self) -> SnapshotResult<Snapshot> {
        self.snapshot_at(Instant::now()).await
    }

    /// Same as [`snapshot`](Self::snapshot) with an explicit clock reading.
    pub async fn snapshot_at(&self, now: Instant) -> SnapshotResult<Snapshot> {
        let ttl = self.settings.cache_ttl;
        if let Some(body) = self.cache.get_fresh(now, ttl).await {
            debug!("Serving graph snapshot from cache");
            return Ok(Snapshot { body, cache_hit: true });
        }

        // Concurrent misses queue here; whoever comes second finds the slot
        // already refreshed.
        let _guard = self.refresh.lock().await;
        if let Some(body) = self.cache.get_fresh(now, ttl).await {
            debug!("Graph snapshot refreshed by a concurrent request");
            return Ok(Snapshot { body, cache_hit: true });
        }

        let payload = self.build_payload().await?;
        let body: Arc<str> = Arc::from(serde_json::to_string(&payload)?);
        self.cache.store(now, Arc::clone(&body)).await;

        Ok(Snapshot { body, cache_hit: false })
    }

    /// Run the traversal and reshape its rows, bypassing the cache.
    pub async fn build_payload(&self) -> SnapshotResult<SnapshotPayload> {
        let SnapshotSettings { limits, policy, tooltips, .. } = self.settings;

        let records = self.source.fetch_records(policy, limits).await?;
        let row_count = records.len();

        let mut acc = GraphAccumulator::new(tooltips);
        for record in &records {
            acc.push(record);
        }
        let (nodes, edges, dropped) = acc.into_pruned();

        if dropped > 0 {
            warn!(dropped, %policy, "Dropped edges whose endpoints fell outside the node limit");
        }
        info!(
            rows = row_count,
            nodes = nodes.len(),
            edges = edges.len(),
            %policy,
            "Graph snapshot built"
        );

        Ok(SnapshotPayload {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            limits: AppliedLimits {
                node_limit: policy.applies_node_limit().then_some(limits.node_limit),
                row_limit: limits.row_limit,
            },
            nodes,
            edges,
        })
    }
}
