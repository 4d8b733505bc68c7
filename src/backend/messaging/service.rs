/**
 * Messaging Service
 *
 * Orchestrates a send across the directory, the thread registry and the
 * message log, and exposes the read side used by the HTTP handlers.
 *
 * # Send flow
 *
 * 1. Validate the content
 * 2. Resolve the sender (role hint first) and the receiver (complement role first)
 * 3. Get or create the thread for the pair
 * 4. Append the message, which refreshes the thread summary
 *
 * The thread exists before the summary is written, so the summary update
 * never targets a missing thread.
 */

use std::sync::Arc;
use thiserror::Error;

use super::directory::Directory;
use super::log::MessageLog;
use super::threads::ThreadRegistry;
use crate::backend::store::{MessageStore, RecordStore, StoreError};
use crate::shared::messaging::{Message, MessageThread};
use crate::shared::{Participant, Role};

/// Failures of messaging operations
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid message content: {0}")]
    InvalidContent(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("User {user_id} is not a participant of thread {thread_id}")]
    Forbidden { user_id: String, thread_id: String },

    /// Both sides of a conversation are the same user
    #[error("A conversation needs two different users, got {0} twice")]
    InvalidParticipants(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tunables of the messaging service
#[derive(Debug, Clone, Copy)]
pub struct MessagingSettings {
    /// Longest accepted message, in characters
    pub max_message_length: usize,
    /// Size of the "recent messages" listing
    pub recent_limit: usize,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self {
            max_message_length: 5000,
            recent_limit: 10,
        }
    }
}

#[derive(Clone)]
pub struct MessagingService {
    directory: Directory,
    threads: ThreadRegistry,
    log: MessageLog,
    recent_limit: usize,
}

impl MessagingService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        messages: Arc<dyn MessageStore>,
        settings: MessagingSettings,
    ) -> Self {
        let directory = Directory::new(records);
        let threads = ThreadRegistry::new(messages.clone(), directory.clone());
        let log = MessageLog::new(messages, threads.clone(), settings.max_message_length);
        Self {
            directory,
            threads,
            log,
            recent_limit: settings.recent_limit,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Send a direct message between two users
    ///
    /// `sender_role` is a lookup hint; the stored roles are those of the
    /// collections the users were found in.
    pub async fn send_message(
        &self,
        sender_id: &str,
        sender_role: Option<Role>,
        receiver_id: &str,
        content: &str,
    ) -> Result<Message, MessagingError> {
        self.log.validate_content(content)?;
        if sender_id == receiver_id {
            return Err(MessagingError::InvalidParticipants(sender_id.to_string()));
        }

        let sender = self.resolve(sender_id, sender_role).await?;
        let receiver = self
            .resolve(receiver_id, Some(sender.role.complement()))
            .await?;

        self.threads
            .get_or_create_with(sender.clone(), receiver.clone())
            .await?;
        let message = self.log.append(sender, receiver, content).await?;

        tracing::info!(
            "Message {} sent in thread {}",
            message.id,
            message.thread_id
        );
        Ok(message)
    }

    /// Send a message inside an existing thread
    ///
    /// The receiver is the other participant of the thread.
    pub async fn send_in_thread(
        &self,
        thread_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<Message, MessagingError> {
        self.log.validate_content(content)?;
        let thread = self.threads.get(thread_id).await?;
        let (sender, receiver) = match (
            thread.participant(sender_id),
            thread.other_participant(sender_id),
        ) {
            (Some(sender), Some(receiver)) => (sender.clone(), receiver.clone()),
            _ => {
                return Err(MessagingError::Forbidden {
                    user_id: sender_id.to_string(),
                    thread_id: thread_id.to_string(),
                })
            }
        };

        self.log.append(sender, receiver, content).await
    }

    /// Get or create the thread between two users
    pub async fn open_thread(&self, a: &str, b: &str) -> Result<MessageThread, MessagingError> {
        self.threads.get_or_create(a, b).await
    }

    pub async fn list_threads(&self, user_id: &str) -> Result<Vec<MessageThread>, MessagingError> {
        self.threads.list_for_user(user_id).await
    }

    pub async fn get_conversation(&self, a: &str, b: &str) -> Result<Vec<Message>, MessagingError> {
        self.log.conversation_between(a, b).await
    }

    /// The user's most recent messages, capped at the configured limit
    pub async fn recent_messages(&self, user_id: &str) -> Result<Vec<Message>, MessagingError> {
        self.log.recent_for(user_id, self.recent_limit).await
    }

    /// Mark the thread's messages addressed to `reader_id` as read
    ///
    /// Returns the number of messages that changed state.
    pub async fn mark_read(&self, thread_id: &str, reader_id: &str) -> Result<u64, MessagingError> {
        let thread = self.threads.get(thread_id).await?;
        if !thread.has_participant(reader_id) {
            return Err(MessagingError::Forbidden {
                user_id: reader_id.to_string(),
                thread_id: thread_id.to_string(),
            });
        }
        let updated = self.log.mark_read(thread_id, reader_id).await?;
        tracing::debug!("Marked {} messages read in {} for {}", updated, thread_id, reader_id);
        Ok(updated)
    }

    /// Recompute a thread's `lastMessage` from the message log
    pub async fn refresh_thread_summary(&self, thread_id: &str) -> Result<MessageThread, MessagingError> {
        let thread = self.threads.get(thread_id).await?;
        let [a, b] = &thread.participants;
        let history = self.log.conversation_between(&a.id, &b.id).await?;
        self.threads.refresh_summary(thread_id, history.last()).await?;
        self.threads.get(thread_id).await
    }

    async fn resolve(&self, user_id: &str, hint: Option<Role>) -> Result<Participant, MessagingError> {
        self.directory
            .resolve(user_id, hint)
            .await?
            .ok_or_else(|| MessagingError::UserNotFound(user_id.to_string()))
    }
}
