use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use betterme_core::analysis_events::ClientMessage;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::state::AppState;
use crate::ws::manager::{SessionRegistry, WsSender};

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The connection only becomes reachable for pushes once the client sends
/// an `init_session` message naming its session id.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.sessions))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Spawns a sender task that forwards messages from the outbound channel.
///   2. Binds the connection to a session on `init_session`.
///   3. Unbinds its own session on close or error.
async fn handle_socket(socket: WebSocket, sessions: Arc<SessionRegistry>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    let mut session_id: Option<String> = None;

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text(&sessions, &conn_id, &tx, &mut session_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: drop our own binding and abort the sender task.
    if let Some(session_id) = session_id.as_deref() {
        sessions.unregister_connection(session_id, &conn_id).await;
    }
    send_task.abort();
    tracing::info!(conn_id = %conn_id, session_id = ?session_id, "WebSocket disconnected");
}

/// Dispatch one inbound text frame.
async fn handle_text(
    sessions: &SessionRegistry,
    conn_id: &str,
    tx: &WsSender,
    current: &mut Option<String>,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Malformed WebSocket message");
            return;
        }
    };

    match message {
        ClientMessage::InitSession { session_id } => {
            if session_id.trim().is_empty() {
                tracing::warn!(conn_id, "init_session with empty sessionId ignored");
                return;
            }
            if let Some(previous) = current.take() {
                if previous != session_id {
                    sessions.unregister_connection(&previous, conn_id).await;
                }
            }
            sessions.register(&session_id, conn_id, tx.clone()).await;
            tracing::info!(conn_id, session_id = %session_id, "Session registered");
            *current = Some(session_id);
        }
        ClientMessage::Unknown => {
            tracing::debug!(conn_id, "Ignoring unknown WebSocket message type");
        }
    }
}
