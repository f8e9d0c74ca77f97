//! Graph read queries.

pub mod diagnostic;
pub mod snapshot;
