/**
 * Thread Registry
 *
 * Owns the lifecycle of message threads: derivation of their identity,
 * idempotent creation, the denormalized `lastMessage` summary and per-user
 * listings.
 *
 * # Concurrency
 *
 * Creation never reads-then-writes. The thread id is derived from the
 * participant pair and the store performs an insert-if-absent keyed by that
 * id, so concurrent "start conversation" calls converge on one thread.
 */

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::directory::Directory;
use super::service::MessagingError;
use crate::backend::store::MessageStore;
use crate::shared::messaging::{derive_thread_id, LastMessage, Message, MessageThread};
use crate::shared::Participant;

#[derive(Clone)]
pub struct ThreadRegistry {
    store: Arc<dyn MessageStore>,
    directory: Directory,
}

impl ThreadRegistry {
    pub fn new(store: Arc<dyn MessageStore>, directory: Directory) -> Self {
        Self { store, directory }
    }

    /// Get the thread between two user ids, creating it if needed
    ///
    /// Both ids are resolved through the directory before creation; an
    /// unknown id fails with `UserNotFound`.
    pub async fn get_or_create(&self, a: &str, b: &str) -> Result<MessageThread, MessagingError> {
        if a == b {
            return Err(MessagingError::InvalidParticipants(a.to_string()));
        }
        if let Some(thread) = self.store.find_thread(&derive_thread_id(a, b)).await? {
            return Ok(thread);
        }

        let first = self
            .directory
            .resolve(a, None)
            .await?
            .ok_or_else(|| MessagingError::UserNotFound(a.to_string()))?;
        let second = self
            .directory
            .resolve(b, None)
            .await?
            .ok_or_else(|| MessagingError::UserNotFound(b.to_string()))?;

        self.get_or_create_with(first, second).await
    }

    /// Get or create the thread for two already resolved participants
    pub async fn get_or_create_with(
        &self,
        a: Participant,
        b: Participant,
    ) -> Result<MessageThread, MessagingError> {
        if a.id == b.id {
            return Err(MessagingError::InvalidParticipants(a.id));
        }
        let candidate = MessageThread::new(a, b, Utc::now());
        Ok(self.store.upsert_thread(&candidate).await?)
    }

    /// Look up a thread by id
    pub async fn get(&self, thread_id: &str) -> Result<MessageThread, MessagingError> {
        self.store
            .find_thread(thread_id)
            .await?
            .ok_or_else(|| MessagingError::ThreadNotFound(thread_id.to_string()))
    }

    /// Advance the last-message summary of a thread
    ///
    /// A summary older than the stored one is ignored, so sends that finish
    /// out of order still leave the newest message in place. Does nothing
    /// when the thread does not exist.
    pub async fn apply_last_message(
        &self,
        thread_id: &str,
        content: &str,
        sent_at: DateTime<Utc>,
        sender_id: &str,
    ) -> Result<(), MessagingError> {
        let last = LastMessage {
            content: content.to_string(),
            sent_at,
            sender_id: sender_id.to_string(),
        };
        self.store.set_last_message(thread_id, &last).await?;
        Ok(())
    }

    /// Rebuild the summary from the newest message of the log.
    ///
    /// The summary is a cache; this brings it back in line after a send that
    /// stored the message but failed to update the thread.
    pub async fn refresh_summary(
        &self,
        thread_id: &str,
        latest: Option<&Message>,
    ) -> Result<(), MessagingError> {
        match latest {
            Some(message) => {
                self.apply_last_message(
                    thread_id,
                    &message.content,
                    message.created_at,
                    message.sender_id(),
                )
                .await
            }
            None => Ok(()),
        }
    }

    /// Threads the user participates in, most recent activity first.
    ///
    /// Threads without any message come last.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<MessageThread>, MessagingError> {
        Ok(self.store.threads_for_participant(user_id).await?)
    }
}
