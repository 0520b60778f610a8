//! Session load lifecycle against a mock content API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use duetrack_content::{ContentClient, ContentSource, RetryConfig};
use duetrack_core::{
    AssignmentId, ContentConfig, FileSlot, FixedClock, PersistedStore, SortBy,
};
use duetrack_session::{LoadState, TrackerSession};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/v2024-01-18/data/query/production";

fn document(id: &str, title: &str, due: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "title": title,
        "course": "Database Systems",
        "courseCode": "CS402",
        "type": "project",
        "dueDate": due
    })
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at("2026-01-20T09:00:00+00:00").unwrap())
}

fn remote(server: &MockServer) -> ContentSource {
    let client = ContentClient::with_base_url(&server.uri(), &ContentConfig::default())
        .unwrap()
        .with_retry(RetryConfig::none());
    ContentSource::remote(client)
}

async fn mount_documents(server: &MockServer, docs: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": docs })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_remote_load_keeps_local_completion_across_sessions() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_documents(
        &server,
        vec![
            document("doc-a", "Schema Design", "2026-01-25T23:59:00Z"),
            document("doc-b", "Query Tuning", "2026-01-21T12:00:00Z"),
        ],
    )
    .await;

    let store = PersistedStore::new(FileSlot::new(dir.path(), "assignmentTracker"));
    let mut session = TrackerSession::open(store, remote(&server), clock());
    assert!(session.assignments().is_empty());

    assert_eq!(session.load().await, &LoadState::Ready);
    assert_eq!(session.assignments().len(), 2);
    assert!(session.toggle_status(&AssignmentId::from("doc-b")));
    session.set_sort_by(SortBy::Priority);
    drop(session);

    // Next launch: the stored list shows immediately, the fetch refreshes it.
    let store = PersistedStore::new(FileSlot::new(dir.path(), "assignmentTracker"));
    let mut session = TrackerSession::open(store, remote(&server), clock());
    assert_eq!(session.assignments().len(), 2);
    session.load().await;

    let b = session
        .assignments()
        .iter()
        .find(|a| a.id == AssignmentId::from("doc-b"))
        .unwrap();
    assert!(b.is_completed());
    assert_eq!(session.view().sort_by, SortBy::Priority);
    assert_eq!(session.filtered_assignments()[0].id, AssignmentId::from("doc-b"));
    assert_eq!(session.stats().completed, 1);
}

#[tokio::test]
async fn test_failed_fetch_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = PersistedStore::in_memory();
    store.save_assignments(&duetrack_content::seed_assignments());
    let mut session = TrackerSession::open(store, remote(&server), clock());

    let state = session.load().await.clone();
    assert!(matches!(state, LoadState::Degraded { .. }));
    assert_eq!(session.assignments().len(), 8);
    assert_eq!(session.stats().total, 8);
}

#[tokio::test]
async fn test_hanging_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "result": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = PersistedStore::in_memory();
    store.save_assignments(&duetrack_content::seed_assignments());
    let mut session = TrackerSession::open(store, remote(&server), clock())
        .with_fetch_timeout(Duration::from_millis(200));

    let state = session.load().await.clone();
    match state {
        LoadState::Degraded { reason } => assert!(reason.contains("too long")),
        other => panic!("expected degraded state, got {:?}", other),
    }
    assert_eq!(session.assignments().len(), 8);
}

#[test]
fn test_close_discards_in_flight_result() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": [] }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        server
    });

    let store = PersistedStore::in_memory();
    store.save_assignments(&duetrack_content::seed_assignments());
    let mut session = TrackerSession::open(store, remote(&server), clock());

    let (tx, rx) = std::sync::mpsc::channel();
    session.request_load(runtime.handle(), &tx);
    assert!(session.is_loading());
    session.close();

    let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(!session.finish_load(message));
    assert_eq!(session.assignments().len(), 8);
    assert_eq!(session.load_state(), &LoadState::Closed);
}

#[test]
fn test_polled_load_applies_newest_only() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_documents(&server, vec![document("doc-a", "Schema Design", "2026-01-25T23:59:00Z")]).await;
        server
    });

    let mut session = TrackerSession::open(PersistedStore::in_memory(), remote(&server), clock());
    let (tx, rx) = std::sync::mpsc::channel();
    session.request_load(runtime.handle(), &tx);
    session.request_load(runtime.handle(), &tx);

    let mut applied = 0;
    for _ in 0..2 {
        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        if session.finish_load(message) {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(session.load_state(), &LoadState::Ready);
    assert_eq!(session.assignments().len(), 1);
}
