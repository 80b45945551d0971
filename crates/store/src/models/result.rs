//! Stored analysis result model.

use betterme_core::types::Timestamp;
use serde::Serialize;

/// A finished analysis snapshot. Never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    /// Analysis text plus any attached images. Opaque to the store.
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl ResultRecord {
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}
