//! # graphsnap graph
//!
//! Neo4j integration for graphsnap.
//!
//! Provides the connection client, the Cypher for each traversal policy,
//! conversion of driver rows into snapshot records, and the ID diagnostic
//! query.

pub mod client;
pub mod queries;
pub mod records;

pub use client::{GraphClient, GraphConfig, LazyGraphClient};
