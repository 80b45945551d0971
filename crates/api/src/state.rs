use std::sync::Arc;

use betterme_core::clock::{Clock, SharedClock};
use betterme_core::types::Timestamp;
use betterme_store::{ProgressStore, ResultStore};

use crate::config::ServerConfig;
use crate::ws::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Time source shared by every store.
    pub clock: SharedClock,
    /// Session id -> live WebSocket channel.
    pub sessions: Arc<SessionRegistry>,
    /// Per-session analysis progress.
    pub progress: Arc<ProgressStore>,
    /// Short-lived results carried between wizard steps.
    pub handoff: Arc<ResultStore>,
    /// Long-lived results behind public share links.
    pub share: Arc<ResultStore>,
    /// Process start, for uptime reporting.
    pub started_at: Timestamp,
}

impl AppState {
    /// Build fresh, empty stores configured from `config`.
    pub fn new(config: ServerConfig, clock: SharedClock) -> Self {
        let progress = ProgressStore::new(Arc::clone(&clock), config.progress_ttl());
        let handoff = ResultStore::new("handoff", Arc::clone(&clock), config.handoff_ttl());
        let share = ResultStore::new("share", Arc::clone(&clock), config.share_ttl());

        Self {
            started_at: clock.now(),
            config: Arc::new(config),
            clock,
            sessions: Arc::new(SessionRegistry::new()),
            progress: Arc::new(progress),
            handoff: Arc::new(handoff),
            share: Arc::new(share),
        }
    }
}
