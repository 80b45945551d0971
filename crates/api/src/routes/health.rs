use axum::extract::State;
use betterme_core::clock::Clock;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Seconds since the state was built.
    pub uptime_secs: i64,
    /// Sessions with a live push channel.
    pub active_sessions: usize,
}

/// GET /health -- returns service status and live session count.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_secs = (state.clock.now() - state.started_at).num_seconds();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs,
        active_sessions: state.sessions.session_count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
