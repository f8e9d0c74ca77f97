//! The seam between the snapshot pipeline and a graph database driver.

use async_trait::async_trait;

use crate::config::{SnapshotLimits, TraversalPolicy};
use crate::model::SourceRecord;

/// Something that can run a bounded traversal and hand back its rows.
///
/// Implementations acquire whatever session they need for the call and must
/// release it before returning, whether the query succeeded or not.
#[async_trait]
pub trait GraphSource: Send + Sync {
    async fn fetch_records(
        &self,
        policy: TraversalPolicy,
        limits: SnapshotLimits,
    ) -> anyhow::Result<Vec<SourceRecord>>;
}
