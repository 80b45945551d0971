//! Shared domain types for the BetterMe analysis relay.
//!
//! Everything here is storage- and transport-agnostic so the store and API
//! crates can agree on ids, timestamps, status values and the push protocol.

pub mod analysis_events;
pub mod clock;
pub mod error;
pub mod ids;
pub mod progress_status;
pub mod types;
