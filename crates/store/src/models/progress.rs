//! Progress record model and the DTOs that write it.

use betterme_core::progress_status::ProgressStatus;
use betterme_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Latest known status of one analysis, keyed by session id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub session_id: String,
    pub status: ProgressStatus,
    /// Percent complete, 0-100.
    pub progress: u8,
    pub message: String,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
}

impl ProgressRecord {
    /// A record is stale once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// DTO for `POST /api/analysis/start`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAnalysis {
    /// Client-generated session id. A server id is generated when absent.
    pub session_id: Option<String>,
}

/// DTO for `POST /api/analysis/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgress {
    pub session_id: String,
    pub status: ProgressStatus,
    /// Range-checked by the handler before it reaches the store.
    pub progress: i64,
    #[serde(default)]
    pub message: String,
}
