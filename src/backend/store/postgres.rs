/**
 * PostgreSQL Store
 *
 * Implements both store traits on top of a sqlx connection pool.
 *
 * # Tables
 *
 * - `records` - one row per document, body kept as JSONB
 * - `messages` - the append-only message log
 * - `message_threads` - one row per participant pair, keyed by the derived id
 *
 * Every `seq` column is a BIGSERIAL used only as an ordering tiebreaker, so
 * rows with equal timestamps come back in insertion order.
 *
 * # Migrations
 *
 * Schema lives in `migrations/` and is applied by [`PgStore::migrate`].
 */

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{
    Collection, Filter, MessageStore, Record, RecordStore, Sort, StoreError, StoreResult,
};
use crate::shared::messaging::{LastMessage, Message, MessageThread};
use crate::shared::{Participant, Role};

const RECORD_COLUMNS: &str = "id, collection, body, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, thread_id, sender_id, sender_name, sender_role, \
     receiver_id, receiver_name, receiver_role, content, read, created_at";

const THREAD_COLUMNS: &str = "thread_id, participants, last_message, created_at, updated_at";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))
    }

    /// Underlying pool, for maintenance queries
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `teacher.id` -> `{teacher,id}` for the `#>` / `#>>` operators
fn json_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

fn record_from_row(row: &PgRow) -> StoreResult<Record> {
    let collection: String = row.try_get("collection")?;
    let body = match row.try_get::<Value, _>("body")? {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Corrupt(format!(
                "record body is not an object: {}",
                other
            )))
        }
    };
    Ok(Record {
        id: row.try_get("id")?,
        collection: collection.parse()?,
        body,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn role_from_row(row: &PgRow, column: &str) -> StoreResult<Role> {
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|_| StoreError::Corrupt(format!("unknown role '{}' in {}", raw, column)))
}

fn message_from_row(row: &PgRow) -> StoreResult<Message> {
    Ok(Message {
        id: row.try_get("id")?,
        thread_id: row.try_get("thread_id")?,
        sender: Participant::new(
            row.try_get::<String, _>("sender_id")?,
            row.try_get::<String, _>("sender_name")?,
            role_from_row(row, "sender_role")?,
        ),
        receiver: Participant::new(
            row.try_get::<String, _>("receiver_id")?,
            row.try_get::<String, _>("receiver_name")?,
            role_from_row(row, "receiver_role")?,
        ),
        content: row.try_get("content")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}

fn thread_from_row(row: &PgRow) -> StoreResult<MessageThread> {
    let participants: [Participant; 2] = serde_json::from_value(row.try_get("participants")?)?;
    let last_message = row
        .try_get::<Option<Value>, _>("last_message")?
        .map(serde_json::from_value)
        .transpose()?;
    Ok(MessageThread {
        thread_id: row.try_get("thread_id")?,
        participants,
        last_message,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: Filter) {
    match filter {
        Filter::All => {}
        Filter::Eq(path, value) => {
            query.push(" AND body #>> ");
            query.push_bind(json_path(&path));
            query.push("::text[] = ");
            query.push_bind(value);
        }
        Filter::Contains(path, value) => {
            query.push(" AND body #> ");
            query.push_bind(json_path(&path));
            query.push("::text[] @> jsonb_build_array(");
            query.push_bind(value);
            query.push("::text)");
        }
        Filter::In(path, values) => {
            query.push(" AND body #>> ");
            query.push_bind(json_path(&path));
            query.push("::text[] = ANY(");
            query.push_bind(values);
            query.push(")");
        }
    }
}

fn push_sort(query: &mut QueryBuilder<'_, Postgres>, sort: Sort) {
    match sort {
        Sort::CreatedAt { descending } => {
            query.push(" ORDER BY created_at");
            query.push(if descending { " DESC" } else { " ASC" });
        }
        Sort::Field { path, descending } => {
            query.push(" ORDER BY body #>> ");
            query.push_bind(json_path(&path));
            query.push("::text[]");
            // absent fields order before present ones, as in MemoryStore
            query.push(if descending {
                " DESC NULLS LAST"
            } else {
                " ASC NULLS FIRST"
            });
        }
    }
    query.push(", seq ASC");
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> StoreResult<Record> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO records (id, collection, body, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(Uuid::new_v4().simple().to_string())
        .bind(collection.as_str())
        .bind(Value::Object(body))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        record_from_row(&row)
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM records WHERE collection = $1 AND id = $2",
            RECORD_COLUMNS
        ))
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find(&self, collection: Collection, filter: Filter, sort: Sort) -> StoreResult<Vec<Record>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM records WHERE collection = ",
            RECORD_COLUMNS
        ));
        query.push_bind(collection.as_str());
        push_filter(&mut query, filter);
        push_sort(&mut query, sort);

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        body: Map<String, Value>,
    ) -> StoreResult<Option<Record>> {
        let row = sqlx::query(&format!(
            "UPDATE records SET body = $3, updated_at = $4 \
             WHERE collection = $1 AND id = $2 RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(collection.as_str())
        .bind(id)
        .bind(Value::Object(body))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: &Message) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, thread_id, sender_id, sender_name, sender_role,
                                  receiver_id, receiver_name, receiver_role, content, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(message.id)
        .bind(&message.thread_id)
        .bind(&message.sender.id)
        .bind(&message.sender.name)
        .bind(message.sender.role.as_str())
        .bind(&message.receiver.id)
        .bind(&message.receiver.name)
        .bind(message.receiver.role.as_str())
        .bind(&message.content)
        .bind(message.read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_thread(&self, thread: &MessageThread) -> StoreResult<MessageThread> {
        let participant_ids: Vec<&str> = thread.participants.iter().map(|p| p.id.as_str()).collect();
        let last_message = thread
            .last_message
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO message_threads (thread_id, participants, participant_ids, last_message,
                                         last_sent_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (thread_id) DO NOTHING
            "#,
        )
        .bind(&thread.thread_id)
        .bind(serde_json::to_value(&thread.participants)?)
        .bind(participant_ids)
        .bind(last_message)
        .bind(thread.last_activity())
        .bind(thread.created_at)
        .bind(thread.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_thread(&thread.thread_id)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("thread {} vanished after upsert", thread.thread_id)))
    }

    async fn find_thread(&self, thread_id: &str) -> StoreResult<Option<MessageThread>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM message_threads WHERE thread_id = $1",
            THREAD_COLUMNS
        ))
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(thread_from_row).transpose()
    }

    async fn set_last_message(&self, thread_id: &str, last: &LastMessage) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE message_threads
            SET last_message = $2, last_sent_at = $3, updated_at = $4
            WHERE thread_id = $1 AND (last_sent_at IS NULL OR last_sent_at <= $3)
            "#,
        )
        .bind(thread_id)
        .bind(serde_json::to_value(last)?)
        .bind(last.sent_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn threads_for_participant(&self, user_id: &str) -> StoreResult<Vec<MessageThread>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM message_threads WHERE $1 = ANY(participant_ids) \
             ORDER BY last_sent_at DESC NULLS LAST, \
                      (CASE WHEN last_sent_at IS NULL THEN created_at END) DESC NULLS LAST, \
                      thread_id ASC",
            THREAD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(thread_from_row).collect()
    }

    async fn messages_between(&self, a: &str, b: &str) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        ))
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    async fn recent_messages_for(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM messages WHERE sender_id = $1 OR receiver_id = $1 \
             ORDER BY created_at DESC, seq DESC LIMIT $2",
            MESSAGE_COLUMNS
        ))
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    async fn mark_read(&self, thread_id: &str, reader_id: &str) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read = TRUE
            WHERE thread_id = $1 AND receiver_id = $2 AND read = FALSE
            "#,
        )
        .bind(thread_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
