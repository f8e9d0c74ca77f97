//! Route handlers.

pub mod graph;
