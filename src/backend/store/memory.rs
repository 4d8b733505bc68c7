//! In-memory store
//!
//! Backs both store traits with process-local maps. Each operation holds a
//! single lock for its whole duration, which gives the same atomicity the
//! SQL statements of [`super::PgStore`] provide.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    lookup, Collection, Filter, MessageStore, Record, RecordStore, Sort, StoreResult,
};
use crate::shared::messaging::{recency_cmp, LastMessage, Message, MessageThread};

/// Store used when no database is configured, and by tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Records per collection, in insertion order
    records: RwLock<HashMap<Collection, Vec<Record>>>,
    /// Message log in insertion order
    messages: RwLock<Vec<Message>>,
    threads: RwLock<HashMap<String, MessageThread>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_records(records: &mut [Record], sort: &Sort) {
    match sort {
        Sort::CreatedAt { descending } => records.sort_by(|a, b| {
            let ord = a.created_at.cmp(&b.created_at);
            if *descending {
                ord.reverse()
            } else {
                ord
            }
        }),
        Sort::Field { path, descending } => records.sort_by(|a, b| {
            let ord = field_key(a, path).cmp(&field_key(b, path));
            if *descending {
                ord.reverse()
            } else {
                ord
            }
        }),
    }
}

/// Sort key of a body field; absent fields order before present ones
fn field_key(record: &Record, path: &str) -> Option<String> {
    lookup(&record.body, path).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> StoreResult<Record> {
        let now = Utc::now();
        let record = Record {
            id: Uuid::new_v4().simple().to_string(),
            collection,
            body,
            created_at: now,
            updated_at: now,
        };
        self.records
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        let records = self.records.read().await;
        Ok(records
            .get(&collection)
            .and_then(|items| items.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn find(&self, collection: Collection, filter: Filter, sort: Sort) -> StoreResult<Vec<Record>> {
        let records = self.records.read().await;
        let mut found: Vec<Record> = records
            .get(&collection)
            .map(|items| items.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();
        sort_records(&mut found, &sort);
        Ok(found)
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        body: Map<String, Value>,
    ) -> StoreResult<Option<Record>> {
        let mut records = self.records.write().await;
        let Some(record) = records
            .get_mut(&collection)
            .and_then(|items| items.iter_mut().find(|r| r.id == id))
        else {
            return Ok(None);
        };
        record.body = body;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let Some(items) = records.get_mut(&collection) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|r| r.id != id);
        Ok(items.len() != before)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &Message) -> StoreResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn upsert_thread(&self, thread: &MessageThread) -> StoreResult<MessageThread> {
        let mut threads = self.threads.write().await;
        let stored = threads
            .entry(thread.thread_id.clone())
            .or_insert_with(|| thread.clone());
        Ok(stored.clone())
    }

    async fn find_thread(&self, thread_id: &str) -> StoreResult<Option<MessageThread>> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }

    async fn set_last_message(&self, thread_id: &str, last: &LastMessage) -> StoreResult<()> {
        let mut threads = self.threads.write().await;
        let Some(thread) = threads.get_mut(thread_id) else {
            return Ok(());
        };
        // never move the summary back to an older message
        if thread
            .last_message
            .as_ref()
            .is_some_and(|current| current.sent_at > last.sent_at)
        {
            return Ok(());
        }
        thread.updated_at = Utc::now();
        thread.last_message = Some(last.clone());
        Ok(())
    }

    async fn threads_for_participant(&self, user_id: &str) -> StoreResult<Vec<MessageThread>> {
        let threads = self.threads.read().await;
        let mut found: Vec<MessageThread> = threads
            .values()
            .filter(|t| t.has_participant(user_id))
            .cloned()
            .collect();
        found.sort_by(recency_cmp);
        Ok(found)
    }

    async fn messages_between(&self, a: &str, b: &str) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        // stable: equal timestamps keep log order
        found.sort_by(|x, y| x.created_at.cmp(&y.created_at));
        Ok(found)
    }

    async fn recent_messages_for(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<(usize, &Message)> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.involves(user_id))
            .collect();
        found.sort_by(|(i, x), (j, y)| match y.created_at.cmp(&x.created_at) {
            Ordering::Equal => j.cmp(i),
            ord => ord,
        });
        Ok(found.into_iter().take(limit).map(|(_, m)| m.clone()).collect())
    }

    async fn mark_read(&self, thread_id: &str, reader_id: &str) -> StoreResult<u64> {
        let mut messages = self.messages.write().await;
        let mut updated = 0;
        for message in messages
            .iter_mut()
            .filter(|m| m.thread_id == thread_id && m.receiver.id == reader_id && !m.read)
        {
            message.read = true;
            updated += 1;
        }
        Ok(updated)
    }
}
