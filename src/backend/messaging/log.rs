//! Message Log
//!
//! The authoritative, append-only record of direct messages. Appending a
//! message also refreshes the `lastMessage` summary of its thread; the two
//! writes are separate store operations and the log wins if they diverge.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;

use super::service::MessagingError;
use super::threads::ThreadRegistry;
use crate::backend::store::MessageStore;
use crate::shared::messaging::Message;
use crate::shared::Participant;

#[derive(Clone)]
pub struct MessageLog {
    store: Arc<dyn MessageStore>,
    threads: ThreadRegistry,
    max_length: usize,
}

impl MessageLog {
    pub fn new(store: Arc<dyn MessageStore>, threads: ThreadRegistry, max_length: usize) -> Self {
        Self {
            store,
            threads,
            max_length,
        }
    }

    /// Check a message body against the content rules
    pub fn validate_content(&self, content: &str) -> Result<(), MessagingError> {
        if content.trim().is_empty() {
            return Err(MessagingError::InvalidContent(
                "message content cannot be empty".to_string(),
            ));
        }
        let length = content.chars().count();
        if length > self.max_length {
            return Err(MessagingError::InvalidContent(format!(
                "message content is {} characters, the limit is {}",
                length, self.max_length
            )));
        }
        Ok(())
    }

    /// Validate, stamp and persist a message, then update its thread summary
    pub async fn append(
        &self,
        sender: Participant,
        receiver: Participant,
        content: &str,
    ) -> Result<Message, MessagingError> {
        self.validate_content(content)?;
        if sender.id == receiver.id {
            return Err(MessagingError::InvalidParticipants(sender.id));
        }

        // microsecond precision, as stored by TIMESTAMPTZ
        let sent_at = Utc::now().trunc_subsecs(6);
        let message = Message::new(sender, receiver, content.to_string(), sent_at);
        self.store.insert_message(&message).await?;

        self.threads
            .apply_last_message(
                &message.thread_id,
                &message.content,
                message.created_at,
                message.sender_id(),
            )
            .await?;

        Ok(message)
    }

    /// Messages between two users in either direction, oldest first
    pub async fn conversation_between(&self, a: &str, b: &str) -> Result<Vec<Message>, MessagingError> {
        Ok(self.store.messages_between(a, b).await?)
    }

    /// Most recent messages sent or received by the user, newest first
    pub async fn recent_for(&self, user_id: &str, limit: usize) -> Result<Vec<Message>, MessagingError> {
        Ok(self.store.recent_messages_for(user_id, limit).await?)
    }

    /// Mark every unread message of the thread addressed to `reader_id` as read
    pub async fn mark_read(&self, thread_id: &str, reader_id: &str) -> Result<u64, MessagingError> {
        Ok(self.store.mark_read(thread_id, reader_id).await?)
    }
}
