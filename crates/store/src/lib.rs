//! In-memory, TTL-bounded stores for analysis progress and results.
//!
//! Nothing here survives a process restart. Each store is an explicit object
//! built at startup with an injected [`Clock`](betterme_core::clock::Clock);
//! there are no process-wide singletons.

pub mod models;
pub mod repositories;

pub use repositories::{ProgressStore, ResultStore};
