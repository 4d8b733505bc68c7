//! Message Data Structure
//!
//! Represents a single direct message between two participants, plus the
//! request and response bodies of the messaging API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::thread::derive_thread_id;
use crate::shared::participant::{Participant, Role};

/// A direct message
///
/// Immutable once created except for `read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,
    /// Thread derived from the sender/receiver pair
    pub thread_id: String,
    pub sender: Participant,
    pub receiver: Participant,
    pub content: String,
    /// Whether the receiver has read the message
    pub read: bool,
    /// When the message was appended to the log
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new unread message, deriving its thread id
    pub fn new(
        sender: Participant,
        receiver: Participant,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            thread_id: derive_thread_id(&sender.id, &receiver.id),
            sender,
            receiver,
            content,
            read: false,
            created_at,
        }
    }

    pub fn sender_id(&self) -> &str {
        &self.sender.id
    }

    pub fn receiver_id(&self) -> &str {
        &self.receiver.id
    }

    /// True if the user sent or received this message
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender.id == user_id || self.receiver.id == user_id
    }

    /// True if the message was exchanged between `a` and `b`, in either direction
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender.id == a && self.receiver.id == b)
            || (self.sender.id == b && self.receiver.id == a)
    }
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    /// Role the sender claims; used to pick the directory to look them up in
    #[serde(default)]
    pub sender_role: Option<Role>,
}

/// Body of `POST /api/messages/thread`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRequest {
    pub sender_id: String,
    pub receiver_id: String,
}

/// Body of `POST /api/messages/thread/{threadId}/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessageRequest {
    pub sender_id: String,
    pub content: String,
}

/// Body of `PATCH /api/messages/thread/{threadId}/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub user_id: String,
}

/// Acknowledgement returned after marking a thread read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub thread_id: String,
    /// Number of messages that went from unread to read
    pub updated: u64,
}

/// Response of `GET /api/presence/{userId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub user_id: String,
    pub online: bool,
}

/// Frames pushed to a user's live connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A message addressed to the connected user was stored
    Message { message: Message },
}
