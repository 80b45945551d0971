use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use betterme_core::analysis_events::PushEvent;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// The live channel bound to one session id.
pub struct SessionChannel {
    /// Id of the WebSocket connection that owns this registration.
    pub conn_id: String,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
}

/// Maps client session ids to live push channels.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionChannel>>,
}

impl SessionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `session_id` to a connection's sender, replacing any prior binding.
    pub async fn register(&self, session_id: &str, conn_id: &str, sender: WsSender) {
        let channel = SessionChannel {
            conn_id: conn_id.to_string(),
            sender,
        };
        let previous = self
            .sessions
            .write()
            .await
            .insert(session_id.to_string(), channel);

        if let Some(previous) = previous {
            if previous.conn_id != conn_id {
                tracing::debug!(
                    session_id,
                    old_conn_id = %previous.conn_id,
                    new_conn_id = %conn_id,
                    "Session rebound to a new connection",
                );
            }
        }
    }

    /// Remove the binding for `session_id`. No-op if absent.
    pub async fn unregister(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Remove the binding for `session_id` only if `conn_id` still owns it.
    ///
    /// Called when a connection closes, so a client that reconnected under
    /// the same session id keeps its newer binding.
    pub async fn unregister_connection(&self, session_id: &str, conn_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(session_id)
            .is_some_and(|channel| channel.conn_id == conn_id)
        {
            sessions.remove(session_id);
            true
        } else {
            false
        }
    }

    /// Current sender for `session_id`, if one is registered.
    pub async fn lookup(&self, session_id: &str) -> Option<WsSender> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|channel| channel.sender.clone())
    }

    /// Serialize `event` and send it to the session's live channel.
    ///
    /// Returns `true` if the message was handed to an open channel. An absent
    /// or closed channel is not an error: the event is dropped and the caller
    /// falls back to polling. Closed channels are unregistered on the way out.
    pub async fn push(&self, session_id: &str, event: &PushEvent) -> bool {
        let (conn_id, sender) = {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(channel) => (channel.conn_id.clone(), channel.sender.clone()),
                None => {
                    tracing::debug!(session_id, event = event.type_name(), "No live channel for session");
                    return false;
                }
            }
        };

        let text = match serde_json::to_string(event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Failed to serialize push event");
                return false;
            }
        };

        if let Err(e) = sender.send(Message::Text(text.into())) {
            tracing::warn!(session_id, conn_id = %conn_id, error = %e, "Push channel closed, dropping event");
            self.unregister_connection(session_id, &conn_id).await;
            return false;
        }

        tracing::debug!(session_id, event = event.type_name(), "Pushed event to session");
        true
    }

    /// Return the current number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Send a Close frame to every registered session, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops.
    pub async fn shutdown_all(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        for channel in sessions.values() {
            let _ = channel.sender.send(Message::Close(None));
        }
        sessions.clear();
        tracing::info!(count, "Closed all WebSocket sessions");
    }

    /// Send a Ping frame to every registered session.
    pub async fn ping_all(&self) {
        let sessions = self.sessions.read().await;
        for channel in sessions.values() {
            let _ = channel.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
