//! Centralized error types for graphsnap.

use thiserror::Error;

/// Main error type for snapshot operations.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] anyhow::Error),

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

impl SnapshotError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
