//! Presence and routing integration tests

use axum::http::StatusCode;

use schoolhub::shared::messaging::PresenceResponse;

use crate::assert_api_error;
use crate::common::TestApp;

#[tokio::test]
async fn test_presence_follows_registry() {
    let app = TestApp::new();

    let before: PresenceResponse = app.server.get("/api/presence/s1").await.json();
    assert!(!before.online);
    assert_eq!(before.user_id, "s1");

    let (handle, _outbound) = app.state.connections.register("s1");
    let during: PresenceResponse = app.server.get("/api/presence/s1").await.json();
    assert!(during.online);

    app.state.connections.unregister(&handle);
    let after: PresenceResponse = app.server.get("/api/presence/s1").await.json();
    assert!(!after.online);
}

#[tokio::test]
async fn test_presence_drops_after_two_silent_sweeps() {
    let app = TestApp::new();
    let (_handle, _outbound) = app.state.connections.register("s1");

    app.state.connections.sweep();
    let suspect: PresenceResponse = app.server.get("/api/presence/s1").await.json();
    assert!(suspect.online);

    app.state.connections.sweep();
    let evicted: PresenceResponse = app.server.get("/api/presence/s1").await.json();
    assert!(!evicted.online);
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::new();
    let response = app.server.get("/api/does-not-exist").await;
    let message = assert_api_error!(response, StatusCode::NOT_FOUND);
    assert_eq!(message, "Endpoint not found");
}
