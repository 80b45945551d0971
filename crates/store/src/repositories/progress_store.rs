//! Per-session progress tracking with a sliding 30 minute horizon.
//!
//! Every write refreshes `expires_at`. A stale record is treated as absent by
//! [`ProgressStore::get`] and removed on the spot; [`ProgressStore::sweep`]
//! removes the ones nobody reads again.

use std::collections::HashMap;

use betterme_core::clock::SharedClock;
use betterme_core::progress_status::{ProgressStatus, MSG_ANALYSIS_STARTED};
use chrono::Duration;
use tokio::sync::RwLock;

use crate::models::progress::ProgressRecord;

/// Default horizon from the last write: 30 minutes.
pub const DEFAULT_PROGRESS_TTL_SECS: i64 = 30 * 60;

/// At most one [`ProgressRecord`] per session id, last write wins.
///
/// All operations take the map lock exactly once (or re-check after
/// upgrading), so each one is atomic with respect to the others.
pub struct ProgressStore {
    records: RwLock<HashMap<String, ProgressRecord>>,
    clock: SharedClock,
    ttl: Duration,
}

impl ProgressStore {
    pub fn new(clock: SharedClock, ttl: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
            ttl,
        }
    }

    pub fn with_default_ttl(clock: SharedClock) -> Self {
        Self::new(clock, Duration::seconds(DEFAULT_PROGRESS_TTL_SECS))
    }

    /// Record that an analysis has begun, replacing any earlier record.
    pub async fn start(&self, session_id: &str) -> ProgressRecord {
        self.write(
            session_id,
            ProgressStatus::Analyzing,
            0,
            MSG_ANALYSIS_STARTED.to_string(),
        )
        .await
    }

    /// Overwrite the record for `session_id`, creating it if needed.
    ///
    /// `progress` is stored as given; monotonicity is not checked.
    pub async fn update(
        &self,
        session_id: &str,
        status: ProgressStatus,
        progress: u8,
        message: impl Into<String>,
    ) -> ProgressRecord {
        self.write(session_id, status, progress, message.into()).await
    }

    /// Fetch the record for `session_id`.
    ///
    /// Returns `None` when the record is absent or stale. A stale record is
    /// deleted by this call, so later reads also see `None`.
    pub async fn get(&self, session_id: &str) -> Option<ProgressRecord> {
        let now = self.clock.now();
        {
            let records = self.records.read().await;
            match records.get(session_id) {
                None => return None,
                Some(record) if !record.is_expired_at(now) => return Some(record.clone()),
                Some(_) => {}
            }
        }

        // Stale: re-check under the write lock, a writer may have refreshed it.
        let mut records = self.records.write().await;
        if records
            .get(session_id)
            .is_some_and(|record| record.is_expired_at(now))
        {
            records.remove(session_id);
            tracing::debug!(session_id, "Evicted stale progress record on read");
            return None;
        }
        records.get(session_id).cloned()
    }

    /// Delete every record whose `expires_at` has passed. Returns the count.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        before - records.len()
    }

    /// Number of records currently held, stale ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn write(
        &self,
        session_id: &str,
        status: ProgressStatus,
        progress: u8,
        message: String,
    ) -> ProgressRecord {
        let now = self.clock.now();
        let record = ProgressRecord {
            session_id: session_id.to_string(),
            status,
            progress,
            message,
            updated_at: now,
            expires_at: now + self.ttl,
        };
        let previous = self
            .records
            .write()
            .await
            .insert(session_id.to_string(), record.clone());

        if let Some(previous) = previous {
            if previous.status.is_terminal()
                && previous.status != status
                && !previous.is_expired_at(now)
            {
                tracing::debug!(
                    session_id,
                    from = %previous.status,
                    to = %status,
                    "Overwriting terminal progress state",
                );
            }
        }
        record
    }
}
