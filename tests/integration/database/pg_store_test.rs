//! PostgreSQL store tests
//!
//! Same behaviors as the in-memory store, checked against a real database.
//! Each test returns early when no test database is configured.

use serde_json::{json, Map, Value};
use serial_test::serial;
use std::sync::Arc;

use schoolhub::backend::messaging::{MessagingService, MessagingSettings};
use schoolhub::backend::store::{Collection, Filter, MessageStore, RecordStore, Sort};
use chrono::{Duration, TimeZone, Utc};
use schoolhub::shared::messaging::{LastMessage, MessageThread};
use schoolhub::shared::{Participant, Role};

use crate::common::test_pg_store;

fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[tokio::test]
#[serial]
async fn test_records_filter_on_nested_fields() {
    let Some(store) = test_pg_store().await else {
        return;
    };

    store
        .insert(Collection::Documents, body(json!({"title": "A", "teacher": {"id": "t1"}})))
        .await
        .unwrap();
    store
        .insert(Collection::Documents, body(json!({"title": "B", "teacher": {"id": "t2"}})))
        .await
        .unwrap();
    store
        .insert(Collection::Classrooms, body(json!({"name": "7B", "students": ["s1", "s2"]})))
        .await
        .unwrap();

    let docs = store
        .find(Collection::Documents, Filter::eq("teacher.id", "t1"), Sort::newest_first())
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].str_field("title"), Some("A"));

    let rooms = store
        .find(Collection::Classrooms, Filter::contains("students", "s2"), Sort::default())
        .await
        .unwrap();
    assert_eq!(rooms.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_messaging_over_postgres() {
    let Some(store) = test_pg_store().await else {
        return;
    };
    let store = Arc::new(store);

    let sam = store
        .insert(Collection::Students, body(json!({"name": "Sam", "email": "sam@school.test"})))
        .await
        .unwrap();
    let tess = store
        .insert(Collection::Teachers, body(json!({"name": "Tess", "email": "tess@school.test"})))
        .await
        .unwrap();

    let service = MessagingService::new(store.clone(), store.clone(), MessagingSettings::default());
    let first = service
        .send_message(&sam.id, Some(Role::Student), &tess.id, "one")
        .await
        .unwrap();
    service
        .send_message(&tess.id, None, &sam.id, "two")
        .await
        .unwrap();

    let threads = service.list_threads(&sam.id).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].last_message.as_ref().unwrap().content, "two");

    let conversation = service.get_conversation(&tess.id, &sam.id).await.unwrap();
    let contents: Vec<_> = conversation.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two"]);

    assert_eq!(store.mark_read(&first.thread_id, &tess.id).await.unwrap(), 1);
    assert_eq!(store.mark_read(&first.thread_id, &tess.id).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_summary_never_moves_backwards() {
    let Some(store) = test_pg_store().await else {
        return;
    };

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let thread = store
        .upsert_thread(&MessageThread::new(
            Participant::new("s1", "Sam", Role::Student),
            Participant::new("t1", "Tess", Role::Teacher),
            at,
        ))
        .await
        .unwrap();
    let summary = |content: &str, offset: i64| LastMessage {
        content: content.into(),
        sent_at: at + Duration::seconds(offset),
        sender_id: "s1".into(),
    };

    store
        .set_last_message(&thread.thread_id, &summary("second", 2))
        .await
        .unwrap();
    store
        .set_last_message(&thread.thread_id, &summary("first", 1))
        .await
        .unwrap();

    let stored = store.find_thread(&thread.thread_id).await.unwrap().unwrap();
    assert_eq!(stored.last_message.unwrap().content, "second");
}

#[tokio::test]
#[serial]
async fn test_sent_timestamp_matches_stored() {
    let Some(store) = test_pg_store().await else {
        return;
    };
    let store = Arc::new(store);

    let sam = store
        .insert(Collection::Students, body(json!({"name": "Sam"})))
        .await
        .unwrap();
    let tess = store
        .insert(Collection::Teachers, body(json!({"name": "Tess"})))
        .await
        .unwrap();

    let service = MessagingService::new(store.clone(), store.clone(), MessagingSettings::default());
    let sent = service
        .send_message(&sam.id, None, &tess.id, "hi")
        .await
        .unwrap();

    let stored = service.get_conversation(&sam.id, &tess.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].created_at, sent.created_at);
}
