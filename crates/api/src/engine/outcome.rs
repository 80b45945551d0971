//! Analysis outcome handling.
//!
//! Translates a finished (or failed) analysis into a progress update, an
//! optional stored result, and a push to the session's live channel. When
//! no channel is live the push is dropped and the client picks the state up
//! by polling. Nothing here retries.

use betterme_core::analysis_events::PushEvent;
use betterme_core::progress_status::{ProgressStatus, MAX_PROGRESS, MSG_ANALYSIS_COMPLETED};
use serde::Serialize;

use crate::state::AppState;

/// What the caller learns after reporting a successful analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReceipt {
    /// Id of the result in the hand-off store.
    pub result_id: String,
    /// Whether a live channel accepted the `analysis_complete` push.
    pub delivered: bool,
}

/// What the caller learns after reporting a failed analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReceipt {
    pub delivered: bool,
}

/// Mark the session's analysis completed, keep the result for hand-off, and
/// notify the client if it is connected.
pub async fn complete_analysis(
    state: &AppState,
    session_id: &str,
    result: serde_json::Value,
) -> CompletionReceipt {
    state
        .progress
        .update(
            session_id,
            ProgressStatus::Completed,
            MAX_PROGRESS,
            MSG_ANALYSIS_COMPLETED,
        )
        .await;

    let result_id = state.handoff.save(result.clone()).await;

    let delivered = state
        .sessions
        .push(
            session_id,
            &PushEvent::AnalysisComplete {
                result,
                session_id: session_id.to_string(),
            },
        )
        .await;

    tracing::info!(session_id, result_id = %result_id, delivered, "Analysis completed");

    CompletionReceipt {
        result_id,
        delivered,
    }
}

/// Mark the session's analysis failed with `reason` and notify the client if
/// it is connected. Upstream refusals are reported through here too.
pub async fn fail_analysis(state: &AppState, session_id: &str, reason: &str) -> FailureReceipt {
    state
        .progress
        .update(session_id, ProgressStatus::Failed, 0, reason)
        .await;

    let delivered = state
        .sessions
        .push(
            session_id,
            &PushEvent::Error {
                message: reason.to_string(),
            },
        )
        .await;

    tracing::warn!(session_id, reason, delivered, "Analysis failed");

    FailureReceipt { delivered }
}
