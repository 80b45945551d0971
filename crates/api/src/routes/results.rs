//! Route definitions for the two result stores.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Routes mounted at `/results` (7 day share store).
///
/// ```text
/// POST   /          -> save_share_result
/// GET    /{id}      -> get_share_result
/// ```
pub fn share_router() -> Router<AppState> {
    Router::new()
        .route("/", post(results::save_share_result))
        .route("/{id}", get(results::get_share_result))
}

/// Routes mounted at `/handoff` (24 hour hand-off store).
pub fn handoff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(results::save_handoff_result))
        .route("/{id}", get(results::get_handoff_result))
}
