use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use craftbell_core::config::Config;
use craftbell_core::dispatch::SubscriberStore;
use craftbell_server::state::AppState;
use craftbell_server::store::RedbStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build an AppState wired against mock push/compute servers, with a
/// zero-delay poll policy so tests never sleep.
fn test_state(dir: &TempDir, push_base: &str, compute_base: &str) -> AppState {
    let config = Config {
        instance_id: "i-0abc".into(),
        line_channel_token: "test-token".into(),
        compute_api_base: compute_base.into(),
        compute_api_token: "compute-token".into(),
        push_api_base: push_base.into(),
        subscriber_db: dir.path().join("subscribers.redb"),
        trigger_keywords: vec!["start server".into(), "start minecraft".into()],
        poll_attempts: 3,
        poll_interval_secs: 0,
    };
    let store = RedbStore::open(&config.subscriber_db).unwrap();
    AppState::new(config, store)
}

/// POST a raw body to /webhook via `oneshot` and return (status, body text).
async fn post_webhook(app: axum::Router, body: &str) -> (StatusCode, String) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text: String = serde_json::from_slice(&bytes).unwrap_or_default();
    (status, text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthz_responds_ok() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, "http://push.invalid", "http://compute.invalid");
    let app = craftbell_server::build_router(state);

    let req = axum::http::Request::builder()
        .uri("/healthz")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_envelope_is_acknowledged_with_no_events() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, "http://push.invalid", "http://compute.invalid");
    let app = craftbell_server::build_router(state);

    let (status, body) = post_webhook(app, r#"{"events": []}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No events to process");
}

#[tokio::test]
async fn malformed_body_is_acknowledged_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, "http://push.invalid", "http://compute.invalid");
    let app = craftbell_server::build_router(state);

    let (status, body) = post_webhook(app, "this is not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Error occurred but processed");
}

#[tokio::test]
async fn non_trigger_message_takes_no_action() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, "http://push.invalid", "http://compute.invalid");
    let app = craftbell_server::build_router(state);

    let (status, body) = post_webhook(
        app,
        r#"{"events": [{
            "type": "message",
            "source": {"userId": "U1", "type": "user"},
            "message": {"type": "text", "text": "good morning"}
        }]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No action taken");
}

#[tokio::test]
async fn follow_event_saves_subscriber_and_sends_welcome() {
    let mut push = mockito::Server::new_async().await;
    let welcome = push
        .mock("POST", "/v2/bot/message/push")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let mut compute = mockito::Server::new_async().await;
    let describe = compute
        .mock("GET", "/instances/i-0abc")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, &push.url(), &compute.url());
    let app = craftbell_server::build_router(state.clone());

    let (status, body) = post_webhook(
        app,
        r#"{"events": [{"type": "follow", "source": {"userId": "U1", "type": "user"}}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No action taken");
    assert_eq!(state.store.list_all().unwrap(), vec!["U1".to_string()]);
    welcome.assert_async().await;
    describe.assert_async().await;
}

#[tokio::test]
async fn trigger_notifies_every_subscriber_with_the_rendered_status() {
    let mut push = mockito::Server::new_async().await;
    let pushes = push
        .mock("POST", "/v2/bot/message/push")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "messages": [{"type": "text"}],
        })))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let mut compute = mockito::Server::new_async().await;
    compute
        .mock("GET", "/instances/i-0abc")
        .with_status(200)
        .with_body(r#"{"state": "running", "public_ip": "1.2.3.4"}"#)
        .create_async()
        .await;
    let start = compute
        .mock("POST", "/instances/i-0abc/start")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, &push.url(), &compute.url());
    state.store.add("U1").unwrap();
    state.store.add("U2").unwrap();
    let app = craftbell_server::build_router(state);

    let (status, body) = post_webhook(
        app,
        r#"{"events": [{
            "type": "message",
            "source": {"userId": "U1", "type": "user"},
            "message": {"type": "text", "text": "please START SERVER"}
        }]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Server status processed and notified to all users.");
    // Instance was already running, so no start request was issued.
    pushes.assert_async().await;
    start.assert_async().await;
}

#[tokio::test]
async fn unreachable_compute_still_acknowledges_and_notifies_failure() {
    let mut push = mockito::Server::new_async().await;
    let pushes = push
        .mock("POST", "/v2/bot/message/push")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    // Compute base points at a closed port: describe fails, outcome is
    // Failed, and the webhook is still acknowledged with 200.
    let state = test_state(&dir, &push.url(), "http://127.0.0.1:1");
    state.store.add("U1").unwrap();
    let app = craftbell_server::build_router(state);

    let (status, body) = post_webhook(
        app,
        r#"{"events": [{
            "type": "message",
            "source": {"userId": "U1", "type": "user"},
            "message": {"type": "text", "text": "start minecraft"}
        }]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Server status processed and notified to all users.");
    pushes.assert_async().await;
}
