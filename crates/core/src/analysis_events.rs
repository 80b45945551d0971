//! Push-channel message vocabulary.
//!
//! Both directions are JSON text frames tagged with a `type` field.

use serde::{Deserialize, Serialize};

/// Server -> client: the analysis for this session finished.
pub const MSG_TYPE_ANALYSIS_COMPLETE: &str = "analysis_complete";

/// Server -> client: the analysis for this session failed.
pub const MSG_TYPE_ERROR: &str = "error";

/// An event pushed from the server to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    AnalysisComplete {
        result: serde_json::Value,
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Error {
        message: String,
    },
}

impl PushEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            PushEvent::AnalysisComplete { .. } => MSG_TYPE_ANALYSIS_COMPLETE,
            PushEvent::Error { .. } => MSG_TYPE_ERROR,
        }
    }
}

/// A message received from a client over the push channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    InitSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    /// Any other `type` value. Logged and ignored.
    #[serde(other)]
    Unknown,
}
