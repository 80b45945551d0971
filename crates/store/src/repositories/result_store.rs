//! Finished analysis payloads keyed by an opaque result id.
//!
//! One type serves both the 24 hour hand-off store (resume between wizard
//! steps) and the 7 day share store (public links); only the TTL differs.
//! Expired records are evicted lazily by [`ResultStore::get`] and eagerly by
//! [`ResultStore::sweep`].

use std::collections::HashMap;

use betterme_core::clock::SharedClock;
use betterme_core::error::CoreError;
use betterme_core::ids::generate_result_id;
use chrono::Duration;
use tokio::sync::RwLock;

use crate::models::result::ResultRecord;

/// Hand-off store TTL: 24 hours.
pub const HANDOFF_TTL_SECS: i64 = 24 * 60 * 60;

/// Share-link store TTL: 7 days.
pub const SHARE_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Entity name used in [`CoreError`] variants raised by this store.
pub const RESULT_ENTITY: &str = "AnalysisResult";

pub struct ResultStore {
    name: &'static str,
    records: RwLock<HashMap<String, ResultRecord>>,
    clock: SharedClock,
    ttl: Duration,
}

impl ResultStore {
    /// `name` only labels log lines.
    pub fn new(name: &'static str, clock: SharedClock, ttl: Duration) -> Self {
        Self {
            name,
            records: RwLock::new(HashMap::new()),
            clock,
            ttl,
        }
    }

    /// The 24 hour store used to carry a result across wizard steps.
    pub fn handoff(clock: SharedClock) -> Self {
        Self::new("handoff", clock, Duration::seconds(HANDOFF_TTL_SECS))
    }

    /// The 7 day store behind public share links.
    pub fn share(clock: SharedClock) -> Self {
        Self::new("share", clock, Duration::seconds(SHARE_TTL_SECS))
    }

    /// Store `payload` under a freshly generated id and return the id.
    pub async fn save(&self, payload: serde_json::Value) -> String {
        let now = self.clock.now();
        let id = generate_result_id(now);
        let record = ResultRecord {
            id: id.clone(),
            payload,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.records.write().await.insert(id.clone(), record);
        tracing::debug!(store = self.name, result_id = %id, "Saved analysis result");
        id
    }

    /// Fetch a result by id.
    ///
    /// - [`CoreError::NotFound`] if the id is unknown (or already evicted).
    /// - [`CoreError::Expired`] if the record outlived its TTL; the record is
    ///   deleted by this call, so the next read reports `NotFound`.
    pub async fn get(&self, id: &str) -> Result<ResultRecord, CoreError> {
        let now = self.clock.now();
        {
            let records = self.records.read().await;
            match records.get(id) {
                None => return Err(not_found(id)),
                Some(record) if !record.is_expired_at(now) => return Ok(record.clone()),
                Some(_) => {}
            }
        }

        let mut records = self.records.write().await;
        match records.remove(id) {
            // Another reader evicted it between the two locks.
            None => Err(not_found(id)),
            Some(record) if record.is_expired_at(now) => {
                tracing::debug!(store = self.name, result_id = %id, "Evicted expired result on read");
                Err(CoreError::Expired {
                    entity: RESULT_ENTITY,
                    id: id.to_string(),
                })
            }
            Some(record) => {
                let found = record.clone();
                records.insert(id.to_string(), record);
                Ok(found)
            }
        }
    }

    /// Delete every expired record. Returns the count removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        before - records.len()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: RESULT_ENTITY,
        id: id.to_string(),
    }
}
