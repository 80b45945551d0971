//! Tests for the background store sweep.

mod common;

use std::time::Duration as StdDuration;

use betterme_api::background::store_sweep::{self, SweepReport};
use betterme_core::progress_status::ProgressStatus;
use chrono::Duration;
use common::build_test_app;
use serde_json::json;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Test: one pass removes exactly the expired entries from every store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sweep_once_removes_only_expired_entries() {
    let app = build_test_app();
    let state = &app.state;

    state.progress.start("old").await;
    let old_handoff = state.handoff.save(json!("old handoff")).await;
    let old_share = state.share.save(json!("old share")).await;

    app.clock.advance(Duration::hours(25));

    state
        .progress
        .update("young", ProgressStatus::Analyzing, 10, "phase 1")
        .await;
    let young_handoff = state.handoff.save(json!("young handoff")).await;

    let report = store_sweep::sweep_once(state).await;

    assert_eq!(
        report,
        SweepReport {
            progress: 1,
            handoff: 1,
            share: 0,
        }
    );
    assert_eq!(report.total(), 2);
    assert!(state.progress.get("young").await.is_some());
    assert!(state.handoff.get(&young_handoff).await.is_ok());
    assert!(state.handoff.get(&old_handoff).await.is_err());
    assert!(state.share.get(&old_share).await.is_ok());
}

// ---------------------------------------------------------------------------
// Test: a sweep over fresh stores removes nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sweep_once_on_fresh_entries_is_noop() {
    let app = build_test_app();
    app.state.progress.start("s1").await;
    app.state.share.save(json!({"text": "hi"})).await;

    let report = store_sweep::sweep_once(&app.state).await;

    assert_eq!(report, SweepReport::default());
    assert_eq!(app.state.progress.len().await, 1);
    assert_eq!(app.state.share.len().await, 1);
}

// ---------------------------------------------------------------------------
// Test: the loop sweeps on its interval and stops when cancelled
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_sweeps_periodically_and_stops_on_cancel() {
    let app = build_test_app();
    app.state.progress.start("abandoned").await;
    app.state.share.save(json!("abandoned link")).await;
    app.clock.advance(Duration::days(8));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(store_sweep::run(
        app.state.clone(),
        StdDuration::from_millis(20),
        cancel.clone(),
    ));

    let drained = tokio::time::timeout(StdDuration::from_secs(5), async {
        loop {
            if app.state.progress.is_empty().await && app.state.share.is_empty().await {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
    })
    .await;
    assert!(drained.is_ok(), "sweep loop never purged expired entries");

    cancel.cancel();
    tokio::time::timeout(StdDuration::from_secs(5), handle)
        .await
        .expect("sweep loop should stop after cancel")
        .expect("sweep task should not panic");
}
