pub mod analysis;
pub mod health;
pub mod results;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (init_session, pushes)
///
/// /analysis/start                      start a progress record (POST)
/// /analysis/progress                   update a progress record (POST)
/// /analysis/progress/{session_id}      poll a progress record (GET)
/// /analysis/{session_id}/complete      report success (POST)
/// /analysis/{session_id}/fail          report failure (POST)
///
/// /results                             save to the share store (POST)
/// /results/{id}                        read from the share store (GET)
/// /handoff                             save to the hand-off store (POST)
/// /handoff/{id}                        read from the hand-off store (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/analysis", analysis::router())
        .nest("/results", results::share_router())
        .nest("/handoff", results::handoff_router())
}
