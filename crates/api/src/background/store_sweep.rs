//! Periodic eviction of expired progress records and results.
//!
//! Reads already evict lazily; this loop bounds memory for entries nobody
//! reads again (abandoned sessions, unopened share links).

use std::time::Duration;

use betterme_store::ResultStore;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Removal counts from one sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub progress: usize,
    pub handoff: usize,
    pub share: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.progress + self.handoff + self.share
    }
}

/// Sweep every store once.
pub async fn sweep_once(state: &AppState) -> SweepReport {
    SweepReport {
        progress: state.progress.sweep().await,
        handoff: sweep_results(&state.handoff).await,
        share: sweep_results(&state.share).await,
    }
}

async fn sweep_results(store: &ResultStore) -> usize {
    let removed = store.sweep().await;
    if removed > 0 {
        tracing::debug!(store = store.name(), removed, "Expired results swept");
    }
    removed
}

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(state: AppState, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Store sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);
    // Skip the immediate first tick.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Store sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let report = sweep_once(&state).await;
                if report.total() > 0 {
                    tracing::info!(
                        progress = report.progress,
                        handoff = report.handoff,
                        share = report.share,
                        "Store sweep: purged expired entries"
                    );
                } else {
                    tracing::debug!("Store sweep: nothing to purge");
                }
            }
        }
    }
}
