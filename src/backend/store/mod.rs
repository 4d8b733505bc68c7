//! Persistence Interface
//!
//! The only shared mutable resource of the server. Everything above this
//! module talks to the two traits defined here and never to a database
//! driver directly:
//!
//! - [`RecordStore`] - schemaless document collections (students, teachers,
//!   classrooms, ...) with filtering on nested fields
//! - [`MessageStore`] - the message log and the thread registry's storage
//!
//! Coordination between concurrent requests is pushed down to atomic
//! single-statement operations: thread creation is an insert-if-absent keyed
//! by the derived thread id, read-state is a filtered bulk update, messages
//! are plain inserts.
//!
//! # Implementations
//!
//! - [`postgres::PgStore`] - PostgreSQL via sqlx (JSONB bodies)
//! - [`memory::MemoryStore`] - process-local maps with identical semantics,
//!   used when no database is configured and by the test suite

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::shared::messaging::{LastMessage, Message, MessageThread};
use crate::shared::SharedError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be turned back into a domain value
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Students,
    Teachers,
    Classrooms,
    Subjects,
    Documents,
    ExamTemplates,
    Grades,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Students,
        Collection::Teachers,
        Collection::Classrooms,
        Collection::Subjects,
        Collection::Documents,
        Collection::ExamTemplates,
        Collection::Grades,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Teachers => "teachers",
            Collection::Classrooms => "classrooms",
            Collection::Subjects => "subjects",
            Collection::Documents => "documents",
            Collection::ExamTemplates => "exam_templates",
            Collection::Grades => "grades",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown collection '{}'", s)))
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub collection: Collection,
    /// Always a JSON object
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Look up a nested field by dotted path (`teacher.id`)
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup(&self.body, path)
    }

    pub fn str_field(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(Value::as_str)
    }

    /// String members of an array field; empty when absent
    pub fn str_list(&self, path: &str) -> Vec<String> {
        self.field(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Client view: body fields plus `id`, `createdAt`, `updatedAt`.
    ///
    /// `password` never leaves the server.
    pub fn to_json(&self) -> Value {
        let mut out = self.body.clone();
        out.remove("password");
        out.insert("id".to_string(), Value::String(self.id.clone()));
        out.insert("createdAt".to_string(), json_time(self.created_at));
        out.insert("updatedAt".to_string(), json_time(self.updated_at));
        Value::Object(out)
    }
}

fn json_time(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

/// Resolve a dotted path inside a JSON object
pub fn lookup<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = body.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Turn an arbitrary JSON value into a document body
pub fn into_body(value: Value) -> Result<Map<String, Value>, SharedError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SharedError::validation("body", "expected a JSON object")),
    }
}

/// Selection over a collection, matched against nested string fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Field at path equals the value
    Eq(String, String),
    /// Array field at path contains the value
    Contains(String, String),
    /// Field at path equals one of the values
    In(String, Vec<String>),
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(path.into(), value.into())
    }

    pub fn contains(path: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(path.into(), value.into())
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(path, value) => record.str_field(path) == Some(value.as_str()),
            Filter::Contains(path, value) => record
                .field(path)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|v| v.as_str() == Some(value.as_str()))),
            Filter::In(path, values) => record
                .str_field(path)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        }
    }
}

/// Ordering of a collection listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
    CreatedAt { descending: bool },
    /// Order by the string value of a body field
    Field { path: String, descending: bool },
}

impl Sort {
    pub fn newest_first() -> Self {
        Sort::CreatedAt { descending: true }
    }

    pub fn oldest_first() -> Self {
        Sort::CreatedAt { descending: false }
    }

    pub fn field_desc(path: impl Into<String>) -> Self {
        Sort::Field {
            path: path.into(),
            descending: true,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Sort::oldest_first()
    }
}

/// Keyed document collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new document under a freshly generated id
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> StoreResult<Record>;

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>>;

    async fn find(&self, collection: Collection, filter: Filter, sort: Sort) -> StoreResult<Vec<Record>>;

    /// Replace the body of an existing document; `None` if it does not exist
    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        body: Map<String, Value>,
    ) -> StoreResult<Option<Record>>;

    /// Remove a document; `false` if it did not exist
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool>;
}

/// Storage of the message log and message threads
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: &Message) -> StoreResult<()>;

    /// Insert the thread unless one with the same `thread_id` exists.
    ///
    /// Returns the stored thread either way. Concurrent calls for the same
    /// pair converge on a single row.
    async fn upsert_thread(&self, thread: &MessageThread) -> StoreResult<MessageThread>;

    async fn find_thread(&self, thread_id: &str) -> StoreResult<Option<MessageThread>>;

    /// Replace the last-message summary unless the stored one is newer.
    ///
    /// A missing thread is not an error.
    async fn set_last_message(&self, thread_id: &str, last: &LastMessage) -> StoreResult<()>;

    /// Threads the user participates in, most recent activity first
    async fn threads_for_participant(&self, user_id: &str) -> StoreResult<Vec<MessageThread>>;

    /// Messages exchanged between two users in either direction, oldest first.
    ///
    /// Equal timestamps keep insertion order.
    async fn messages_between(&self, a: &str, b: &str) -> StoreResult<Vec<Message>>;

    /// Messages the user sent or received, newest first, at most `limit`
    async fn recent_messages_for(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Message>>;

    /// Flip `read` to true on unread messages of the thread addressed to `reader_id`.
    ///
    /// Returns how many messages changed.
    async fn mark_read(&self, thread_id: &str, reader_id: &str) -> StoreResult<u64>;
}
