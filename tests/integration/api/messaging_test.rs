//! Messaging API integration tests
//!
//! Threads, the message log and read state through `/api/messages`.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use schoolhub::backend::liveness::Outbound;
use schoolhub::shared::messaging::{LiveEvent, MarkReadResponse, Message, MessageThread};
use schoolhub::shared::{derive_thread_id, Role};

use crate::assert_api_error;
use crate::common::TestApp;

async fn send(app: &TestApp, sender: &str, receiver: &str, content: &str) -> Message {
    let response = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sender, "receiverId": receiver, "content": content}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_first_message_creates_thread_for_both_users() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    let message = send(&app, &sam.id, &tess.id, "Hello").await;
    assert_eq!(message.thread_id, derive_thread_id(&sam.id, &tess.id));
    assert_eq!(message.sender.role, Role::Student);
    assert_eq!(message.receiver.role, Role::Teacher);
    assert_eq!(message.receiver.name, "Tess");
    assert!(!message.read);

    for user in [&sam.id, &tess.id] {
        let threads: Vec<MessageThread> = app
            .server
            .get(&format!("/api/messages/threads/{}", user))
            .await
            .json();
        assert_eq!(threads.len(), 1);
        let last = threads[0].last_message.as_ref().expect("summary set");
        assert_eq!(last.content, "Hello");
        assert_eq!(last.sender_id, sam.id);
        assert_eq!(last.sent_at, message.created_at);
    }
}

#[tokio::test]
async fn test_conversation_is_symmetric_and_ascending() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    send(&app, &sam.id, &tess.id, "one").await;
    send(&app, &tess.id, &sam.id, "two").await;
    send(&app, &sam.id, &tess.id, "three").await;

    let forward: Vec<Message> = app
        .server
        .get(&format!("/api/messages/conversation/{}/{}", sam.id, tess.id))
        .await
        .json();
    let backward: Vec<Message> = app
        .server
        .get(&format!("/api/messages/conversation/{}/{}", tess.id, sam.id))
        .await
        .json();

    let contents: Vec<_> = forward.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
    assert_eq!(forward, backward);

    let threads: Vec<MessageThread> = app
        .server
        .get(&format!("/api/messages/threads/{}", tess.id))
        .await
        .json();
    assert_eq!(threads[0].last_message.as_ref().unwrap().content, "three");
}

#[tokio::test]
async fn test_unknown_receiver_is_not_found() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;

    let response = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": "ghost", "content": "hi"}))
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND);

    let threads: Vec<MessageThread> = app
        .server
        .get(&format!("/api/messages/threads/{}", sam.id))
        .await
        .json();
    assert!(threads.is_empty());
}

#[tokio::test]
async fn test_invalid_bodies_are_bad_requests() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    let blank = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id, "content": "   "}))
        .await;
    assert_api_error!(blank, StatusCode::BAD_REQUEST);

    let missing = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "content": "hi"}))
        .await;
    assert_api_error!(missing, StatusCode::BAD_REQUEST);

    let too_long = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id, "content": "x".repeat(5001)}))
        .await;
    assert_api_error!(too_long, StatusCode::BAD_REQUEST);

    let to_self = app
        .server
        .post("/api/messages")
        .json(&json!({"senderId": sam.id, "receiverId": sam.id, "content": "me"}))
        .await;
    assert_api_error!(to_self, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_open_thread_is_idempotent() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    let first: MessageThread = app
        .server
        .post("/api/messages/thread")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id}))
        .await
        .json();
    let second: MessageThread = app
        .server
        .post("/api/messages/thread")
        .json(&json!({"senderId": tess.id, "receiverId": sam.id}))
        .await
        .json();

    assert_eq!(first.thread_id, second.thread_id);
    assert_eq!(first.created_at, second.created_at);
    assert!(first.last_message.is_none());
}

#[tokio::test]
async fn test_send_in_thread_checks_membership() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;
    let max = app.student("Max").await;

    let thread: MessageThread = app
        .server
        .post("/api/messages/thread")
        .json(&json!({"senderId": sam.id, "receiverId": tess.id}))
        .await
        .json();
    let path = format!("/api/messages/thread/{}/messages", thread.thread_id);

    let response = app
        .server
        .post(&path)
        .json(&json!({"senderId": tess.id, "content": "Welcome"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let message: Message = response.json();
    assert_eq!(message.receiver.id, sam.id);

    let outsider = app
        .server
        .post(&path)
        .json(&json!({"senderId": max.id, "content": "let me in"}))
        .await;
    assert_api_error!(outsider, StatusCode::FORBIDDEN);

    let missing = app
        .server
        .post("/api/messages/thread/nope/messages")
        .json(&json!({"senderId": sam.id, "content": "hello?"}))
        .await;
    assert_api_error!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_only_touches_the_readers_messages() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    let first = send(&app, &sam.id, &tess.id, "question").await;
    send(&app, &tess.id, &sam.id, "answer").await;
    let path = format!("/api/messages/thread/{}/read", first.thread_id);

    let ack: MarkReadResponse = app
        .server
        .patch(&path)
        .json(&json!({"userId": tess.id}))
        .await
        .json();
    assert_eq!(ack.updated, 1);
    assert_eq!(ack.thread_id, first.thread_id);

    let again: MarkReadResponse = app
        .server
        .patch(&path)
        .json(&json!({"userId": tess.id}))
        .await
        .json();
    assert_eq!(again.updated, 0);

    let conversation: Vec<Message> = app
        .server
        .get(&format!("/api/messages/conversation/{}/{}", sam.id, tess.id))
        .await
        .json();
    let read: Vec<_> = conversation.iter().map(|m| (m.content.as_str(), m.read)).collect();
    assert_eq!(read, vec![("question", true), ("answer", false)]);
}

#[tokio::test]
async fn test_recent_messages_are_capped_and_descending() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    for i in 0..12 {
        send(&app, &sam.id, &tess.id, &format!("m{}", i)).await;
    }

    let recent: Vec<Message> = app
        .server
        .get(&format!("/api/messages/recent/{}", tess.id))
        .await
        .json();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].content, "m11");
    assert_eq!(recent[9].content, "m2");
    assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_sender_role_hint_falls_back() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;

    let response = app
        .server
        .post("/api/messages")
        .json(&json!({
            "senderId": tess.id,
            "receiverId": sam.id,
            "content": "hint is wrong",
            "senderRole": "student"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let message: Message = response.json();
    assert_eq!(message.sender.role, Role::Teacher);
    assert_eq!(message.receiver.role, Role::Student);
}

#[tokio::test]
async fn test_connected_receiver_gets_live_push() {
    let app = TestApp::new();
    let sam = app.student("Sam").await;
    let tess = app.teacher("Tess").await;
    let (_handle, mut outbound) = app.state.connections.register(&tess.id);

    let message = send(&app, &sam.id, &tess.id, "ping?").await;

    match outbound.try_recv() {
        Ok(Outbound::Event(LiveEvent::Message { message: pushed })) => {
            assert_eq!(pushed, message)
        }
        other => panic!("expected a pushed message, got {:?}", other),
    }
}
