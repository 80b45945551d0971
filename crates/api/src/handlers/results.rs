//! Handlers for stored analysis results.
//!
//! `/results` is backed by the 7 day share store, `/handoff` by the 24 hour
//! hand-off store. Both expose the same save/get contract.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use betterme_core::types::Timestamp;
use betterme_store::ResultStore;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedResult {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

async fn save_into(store: &ResultStore, payload: serde_json::Value) -> impl IntoResponse {
    let id = store.save(payload).await;
    tracing::info!(store = store.name(), result_id = %id, "Analysis result saved");
    (StatusCode::CREATED, Json(DataResponse { data: SavedResult { id } }))
}

/// 404 for unknown ids, 410 for expired ones.
async fn get_from(store: &ResultStore, id: &str) -> AppResult<Json<DataResponse<ResultView>>> {
    let record = store.get(id).await?;
    Ok(Json(DataResponse {
        data: ResultView {
            payload: record.payload,
            created_at: record.created_at,
        },
    }))
}

/// POST /api/results
pub async fn save_share_result(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    save_into(&state.share, payload).await
}

/// GET /api/results/{id}
pub async fn get_share_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    get_from(&state.share, &id).await
}

/// POST /api/handoff
pub async fn save_handoff_result(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    save_into(&state.handoff, payload).await
}

/// GET /api/handoff/{id}
pub async fn get_handoff_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    get_from(&state.handoff, &id).await
}
