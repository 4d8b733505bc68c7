//! WebSocket integration tests
//!
//! Real upgrades over the HTTP transport: the token handshake, heartbeat
//! pings and pongs, eviction and live pushes.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum_test::{TestWebSocket, WsMessage};
use serde_json::json;
use std::time::Duration;

use schoolhub::backend::liveness::{Liveness, SweepReport};
use schoolhub::shared::messaging::{LiveEvent, PresenceResponse};
use schoolhub::shared::Participant;

use crate::assert_api_error;
use crate::common::{token_for, TestApp};

/// Poll `check` until it holds or a second has passed
async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

async fn connect(app: &TestApp, user: &Participant) -> TestWebSocket {
    let socket = app
        .server
        .get_websocket("/")
        .add_query_param("token", token_for(user))
        .await
        .into_websocket()
        .await;
    let connections = app.state.connections.clone();
    let id = user.id.clone();
    assert!(eventually(|| connections.is_online(&id)).await, "never registered");
    socket
}

async fn presence(app: &TestApp, user_id: &str) -> bool {
    let response: PresenceResponse = app
        .server
        .get(&format!("/api/presence/{}", user_id))
        .await
        .json();
    response.online
}

#[tokio::test]
async fn test_handshake_requires_matching_token() {
    let app = TestApp::over_http();
    let sam = app.student("Sam").await;

    let response = app.server.get_websocket("/").await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get_websocket("/")
        .add_query_param("token", "not-a-jwt")
        .await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get_websocket("/")
        .add_query_param("token", token_for(&sam))
        .add_query_param("userId", "someone-else")
        .await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);

    assert!(app.state.connections.is_empty());
}

#[tokio::test]
async fn test_pong_keeps_connection_and_silence_evicts_it() {
    let app = TestApp::over_http();
    let sam = app.student("Sam").await;
    let mut socket = connect(&app, &sam).await;
    assert!(presence(&app, &sam.id).await);

    let report = app.state.connections.sweep();
    assert_eq!(report, SweepReport { probed: 1, evicted: 0 });
    assert_matches!(socket.receive_message().await, WsMessage::Ping(_));

    socket.send_message(WsMessage::Pong(Default::default())).await;
    let connections = app.state.connections.clone();
    let id = sam.id.clone();
    assert!(eventually(|| connections.liveness(&id) == Some(Liveness::Alive)).await);

    // answered: probed again rather than evicted
    let report = app.state.connections.sweep();
    assert_eq!(report, SweepReport { probed: 1, evicted: 0 });
    assert_matches!(socket.receive_message().await, WsMessage::Ping(_));

    // no reply this time
    let report = app.state.connections.sweep();
    assert_eq!(report, SweepReport { probed: 0, evicted: 1 });
    assert!(!presence(&app, &sam.id).await);
    assert_matches!(socket.receive_message().await, WsMessage::Close(_));

    // a further sweep has nothing left to do for this user
    assert_eq!(app.state.connections.sweep(), SweepReport::default());
}

#[tokio::test]
async fn test_client_close_unregisters() {
    let app = TestApp::over_http();
    let sam = app.student("Sam").await;
    let socket = connect(&app, &sam).await;

    socket.close().await;

    let connections = app.state.connections.clone();
    let id = sam.id.clone();
    assert!(eventually(|| !connections.is_online(&id)).await);
    assert!(!presence(&app, &sam.id).await);
}

#[tokio::test]
async fn test_sent_message_is_pushed_to_connected_receiver() {
    let app = TestApp::over_http();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;
    let mut socket = connect(&app, &tess).await;

    let response = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id, "content": "Hello"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let LiveEvent::Message { message } = socket.receive_json::<LiveEvent>().await;
    assert_eq!(message.content, "Hello");
    assert_eq!(message.sender.id, sam.id);
}
