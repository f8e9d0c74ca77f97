//! # graphsnap core
//!
//! Turns raw graph records into a node/edge snapshot for browser graph
//! visualizations, and serves it through a single-slot TTL cache.
//!
//! Nothing in this crate talks to a database. Drivers plug in through
//! [`GraphSource`].

pub mod cache;
pub mod config;
pub mod error;
pub mod label;
pub mod model;
pub mod service;
pub mod source;
pub mod tooltip;
pub mod transform;

pub use cache::{CacheEntry, SnapshotCache};
pub use config::{SnapshotLimits, SnapshotSettings, TraversalPolicy};
pub use error::{SnapshotError, SnapshotResult};
pub use model::{
    AppliedLimits, GraphEdge, GraphNode, SnapshotPayload, SourceNode, SourceRecord,
    SourceRelationship,
};
pub use service::{Snapshot, SnapshotService};
pub use source::GraphSource;
pub use transform::{find_orphans, GraphAccumulator, OrphanEdge};
