//! Handlers for the `/analysis` resource.
//!
//! Called by the upload handler while it drives the external vision-model
//! call, and by the browser while it polls for progress.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use betterme_core::clock::Clock;
use betterme_core::error::CoreError;
use betterme_core::ids::generate_session_id;
use betterme_core::progress_status::{validate_progress, ProgressStatus};
use betterme_core::types::Timestamp;
use betterme_store::models::progress::{StartAnalysis, UpdateProgress};
use serde::{Deserialize, Serialize};

use crate::engine::outcome;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Entity name used in not-found errors for progress records.
const PROGRESS_ENTITY: &str = "AnalysisProgress";

/// Session ids that collide with a static path segment under `/analysis`.
/// `POST /analysis/progress/complete` would hit the polling route instead.
const RESERVED_SESSION_IDS: &[&str] = &["progress"];

/// Response body for `POST /analysis/start` and `POST /analysis/progress`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    pub session_id: String,
}

/// What a polling client sees.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub status: ProgressStatus,
    pub progress: u8,
    pub message: String,
    pub updated_at: Timestamp,
}

/// DTO for `POST /analysis/{session_id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteAnalysis {
    pub result: serde_json::Value,
}

/// DTO for `POST /analysis/{session_id}/fail`.
#[derive(Debug, Deserialize)]
pub struct FailAnalysis {
    pub reason: String,
}

fn require_session_id(session_id: &str) -> Result<(), CoreError> {
    if session_id.trim().is_empty() {
        return Err(CoreError::Validation("sessionId is required".into()));
    }
    if RESERVED_SESSION_IDS.contains(&session_id) {
        return Err(CoreError::Validation(format!(
            "sessionId '{session_id}' is reserved"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

/// POST /api/analysis/start
///
/// Create a progress record in `analyzing` state. The body is optional; a
/// client-supplied `sessionId` is reused, otherwise one is generated.
pub async fn start_analysis(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input: StartAnalysis = if body.iter().all(u8::is_ascii_whitespace) {
        StartAnalysis::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let session_id = match input.session_id {
        Some(id) if !id.trim().is_empty() => {
            require_session_id(&id)?;
            id
        }
        _ => {
            let id = generate_session_id(state.clock.now());
            tracing::debug!(session_id = %id, "No client session id, generated one");
            id
        }
    };

    state.progress.start(&session_id).await;
    tracing::info!(session_id = %session_id, "Analysis session started");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionRef { session_id },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// POST /api/analysis/progress
///
/// Overwrite the progress record for a session (upsert).
pub async fn update_progress(
    State(state): State<AppState>,
    Json(input): Json<UpdateProgress>,
) -> AppResult<impl IntoResponse> {
    require_session_id(&input.session_id)?;
    let progress = validate_progress(input.progress)?;

    let record = state
        .progress
        .update(&input.session_id, input.status, progress, input.message)
        .await;

    tracing::debug!(
        session_id = %record.session_id,
        status = %record.status,
        progress = record.progress,
        "Analysis progress updated",
    );

    Ok(Json(DataResponse {
        data: SessionRef {
            session_id: record.session_id,
        },
    }))
}

/// GET /api/analysis/progress/{session_id}
///
/// 404 when the record is absent or stale.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .progress
        .get(&session_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: PROGRESS_ENTITY,
            id: session_id,
        }))?;

    Ok(Json(DataResponse {
        data: ProgressView {
            status: record.status,
            progress: record.progress,
            message: record.message,
            updated_at: record.updated_at,
        },
    }))
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// POST /api/analysis/{session_id}/complete
///
/// Record success, keep the result in the hand-off store, and push
/// `analysis_complete` to the session if it is connected.
pub async fn complete_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(input): Json<CompleteAnalysis>,
) -> AppResult<impl IntoResponse> {
    require_session_id(&session_id)?;
    let receipt = outcome::complete_analysis(&state, &session_id, input.result).await;
    Ok(Json(DataResponse { data: receipt }))
}

/// POST /api/analysis/{session_id}/fail
///
/// Record failure (including model refusals) and push `error` to the
/// session if it is connected.
pub async fn fail_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(input): Json<FailAnalysis>,
) -> AppResult<impl IntoResponse> {
    require_session_id(&session_id)?;
    if input.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "reason is required".into(),
        )));
    }
    let receipt = outcome::fail_analysis(&state, &session_id, &input.reason).await;
    Ok(Json(DataResponse { data: receipt }))
}
