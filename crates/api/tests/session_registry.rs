//! Unit tests for `SessionRegistry`.
//!
//! These tests exercise the registry directly, without performing any HTTP
//! upgrades. Channels are plain `mpsc` pairs standing in for sockets.

use std::sync::Arc;

use axum::extract::ws::Message;
use betterme_api::config::ServerConfig;
use betterme_api::state::AppState;
use betterme_api::ws::SessionRegistry;
use betterme_core::analysis_events::PushEvent;
use betterme_core::clock::ManualClock;
use betterme_core::progress_status::ProgressStatus;
use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc;

fn channel() -> (
    mpsc::UnboundedSender<Message>,
    mpsc::UnboundedReceiver<Message>,
) {
    mpsc::unbounded_channel()
}

fn complete_event(session_id: &str) -> PushEvent {
    PushEvent::AnalysisComplete {
        result: json!({"analysis": "ok"}),
        session_id: session_id.to_string(),
    }
}

fn text_json(msg: Message) -> serde_json::Value {
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected text frame, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: new registry starts empty
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_registry_has_zero_sessions() {
    let registry = SessionRegistry::new();

    assert_eq!(registry.session_count().await, 0);
    assert!(registry.lookup("s1").await.is_none());
}

// ---------------------------------------------------------------------------
// Test: register then lookup returns the channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_lookup_returns_sender() {
    let registry = SessionRegistry::new();
    let (tx, mut rx) = channel();

    registry.register("s1", "conn-1", tx).await;
    assert_eq!(registry.session_count().await, 1);

    let sender = registry.lookup("s1").await.expect("sender registered");
    sender.send(Message::Text("direct".into())).unwrap();
    assert!(matches!(rx.recv().await, Some(Message::Text(t)) if t == "direct"));
}

// ---------------------------------------------------------------------------
// Test: push serializes the event onto the session's channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn push_delivers_serialized_event() {
    let registry = SessionRegistry::new();
    let (tx, mut rx) = channel();
    registry.register("s1", "conn-1", tx).await;

    let delivered = registry.push("s1", &complete_event("s1")).await;

    assert!(delivered);
    let value = text_json(rx.recv().await.expect("event pushed"));
    assert_eq!(value["type"], "analysis_complete");
    assert_eq!(value["sessionId"], "s1");
    assert_eq!(value["result"]["analysis"], "ok");
}

// ---------------------------------------------------------------------------
// Test: push only reaches the addressed session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn push_targets_a_single_session() {
    let registry = SessionRegistry::new();
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register("s1", "conn-1", tx1).await;
    registry.register("s2", "conn-2", tx2).await;

    registry
        .push("s2", &PushEvent::Error { message: "refused".into() })
        .await;

    let value = text_json(rx2.recv().await.unwrap());
    assert_eq!(value, json!({"type": "error", "message": "refused"}));
    assert!(rx1.try_recv().is_err(), "s1 must not receive s2's event");
}

// ---------------------------------------------------------------------------
// Test: push to an unregistered session is a silent no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn push_to_unregistered_session_returns_false() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = channel();
    registry.register("other", "conn-1", tx).await;

    let delivered = registry.push("ghost", &complete_event("ghost")).await;

    assert!(!delivered);
    assert_eq!(registry.session_count().await, 1);
}

#[tokio::test]
async fn push_to_unregistered_session_leaves_stores_untouched() {
    let state = AppState::new(
        ServerConfig::default(),
        Arc::new(ManualClock::new(Utc::now())),
    );
    state
        .progress
        .update("ghost", ProgressStatus::Analyzing, 40, "phase 2")
        .await;
    let handoff_id = state.handoff.save(json!({"kept": true})).await;

    let delivered = state
        .sessions
        .push("ghost", &complete_event("ghost"))
        .await;
    assert!(!delivered);

    let progress = state.progress.get("ghost").await.unwrap();
    assert_eq!(progress.status, ProgressStatus::Analyzing);
    assert_eq!(progress.progress, 40);
    assert_eq!(progress.message, "phase 2");
    assert_eq!(state.progress.len().await, 1);

    assert_eq!(state.handoff.len().await, 1);
    assert_eq!(state.handoff.get(&handoff_id).await.unwrap().payload, json!({"kept": true}));
    assert!(state.share.is_empty().await);
}

// ---------------------------------------------------------------------------
// Test: push to a closed channel drops the event and unregisters it
// ---------------------------------------------------------------------------

#[tokio::test]
async fn push_to_closed_channel_unregisters_session() {
    let registry = SessionRegistry::new();
    let (tx, rx) = channel();
    registry.register("s1", "conn-1", tx).await;

    // Drop the receiver to simulate the socket's sender task ending.
    drop(rx);

    let delivered = registry.push("s1", &complete_event("s1")).await;

    assert!(!delivered);
    assert_eq!(registry.session_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: unregister is idempotent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unregister_twice_is_noop() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = channel();
    registry.register("s1", "conn-1", tx).await;

    registry.unregister("s1").await;
    registry.unregister("s1").await;

    assert_eq!(registry.session_count().await, 0);
    assert!(registry.lookup("s1").await.is_none());
}

// ---------------------------------------------------------------------------
// Test: re-registering replaces the previous channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_same_session_replaces_channel() {
    let registry = SessionRegistry::new();
    let (old_tx, mut old_rx) = channel();
    let (new_tx, mut new_rx) = channel();

    registry.register("s1", "conn-1", old_tx).await;
    registry.register("s1", "conn-2", new_tx).await;
    assert_eq!(registry.session_count().await, 1);

    assert!(registry.push("s1", &complete_event("s1")).await);
    assert!(new_rx.recv().await.is_some());
    assert!(old_rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: an old connection closing does not evict a newer binding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_connection_cannot_unregister_newer_binding() {
    let registry = SessionRegistry::new();
    let (old_tx, _old_rx) = channel();
    let (new_tx, _new_rx) = channel();

    registry.register("s1", "conn-old", old_tx).await;
    registry.register("s1", "conn-new", new_tx).await;

    let removed = registry.unregister_connection("s1", "conn-old").await;
    assert!(!removed);
    assert!(registry.lookup("s1").await.is_some());

    let removed = registry.unregister_connection("s1", "conn-new").await;
    assert!(removed);
    assert!(registry.lookup("s1").await.is_none());
}

// ---------------------------------------------------------------------------
// Test: shutdown_all sends Close and clears the registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let registry = SessionRegistry::new();
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register("s1", "conn-1", tx1).await;
    registry.register("s2", "conn-2", tx2).await;

    registry.shutdown_all().await;

    assert_eq!(registry.session_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
    assert!(rx1.recv().await.is_none(), "Channel should be closed after shutdown");
}

// ---------------------------------------------------------------------------
// Test: ping_all reaches every session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_all_sends_ping_to_each_session() {
    let registry = SessionRegistry::new();
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    registry.register("s1", "conn-1", tx1).await;
    registry.register("s2", "conn-2", tx2).await;

    registry.ping_all().await;

    assert!(matches!(rx1.recv().await, Some(Message::Ping(_))));
    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}
