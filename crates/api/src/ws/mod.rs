//! WebSocket infrastructure for pushing analysis events to clients.
//!
//! Provides the session registry, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::{SessionRegistry, WsSender};
