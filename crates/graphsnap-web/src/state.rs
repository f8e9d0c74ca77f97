//! Application state.

use graphsnap_core::SnapshotService;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<SnapshotService>,
}

impl AppState {
    pub fn new(snapshots: Arc<SnapshotService>) -> Self {
        Self { snapshots }
    }
}
