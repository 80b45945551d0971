//! Route definitions for the `/analysis` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// POST   /start                     -> start_analysis
/// POST   /progress                  -> update_progress
/// GET    /progress/{session_id}     -> get_progress
/// POST   /{session_id}/complete     -> complete_analysis
/// POST   /{session_id}/fail         -> fail_analysis
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(analysis::start_analysis))
        .route("/progress", post(analysis::update_progress))
        .route("/progress/{session_id}", get(analysis::get_progress))
        .route("/{session_id}/complete", post(analysis::complete_analysis))
        .route("/{session_id}/fail", post(analysis::fail_analysis))
}
