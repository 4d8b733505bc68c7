//! Message Thread Data Structure
//!
//! A thread is the persistent conversation between exactly two users. Its
//! identity is derived from the participant pair, so every caller that wants
//! "the conversation between A and B" computes the same key without a lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::shared::participant::Participant;

/// Separator placed between the two sorted user ids.
///
/// Record ids are hex strings, so they never contain it.
pub const THREAD_ID_SEPARATOR: char = ':';

/// Derive the thread id for an unordered pair of user ids
///
/// The two ids are sorted lexicographically and joined, which makes the
/// function commutative: `derive_thread_id(a, b) == derive_thread_id(b, a)`.
pub fn derive_thread_id(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut id = String::with_capacity(first.len() + second.len() + 1);
    id.push_str(first);
    id.push(THREAD_ID_SEPARATOR);
    id.push_str(second);
    id
}

/// Denormalized summary of the most recent message in a thread.
///
/// This is a cache over the message log; the log is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub sender_id: String,
}

/// A conversation between two participants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    /// Derived, unique identity (see [`derive_thread_id`])
    pub thread_id: String,
    /// Both participants in canonical (id-sorted) order
    pub participants: [Participant; 2],
    /// Summary of the latest message, `None` until the first send
    pub last_message: Option<LastMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageThread {
    /// Build a new, empty thread for two participants
    ///
    /// Participants are stored sorted by id regardless of argument order.
    pub fn new(a: Participant, b: Participant, now: DateTime<Utc>) -> Self {
        let thread_id = derive_thread_id(&a.id, &b.id);
        let participants = if a.id <= b.id { [a, b] } else { [b, a] };
        Self {
            thread_id,
            participants,
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if user is a participant
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == user_id)
    }

    /// Get the other participant
    pub fn other_participant(&self, user_id: &str) -> Option<&Participant> {
        if !self.has_participant(user_id) {
            return None;
        }
        self.participants.iter().find(|p| p.id != user_id)
    }

    /// Timestamp used for recency ordering, `None` when nothing was sent yet
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_message.as_ref().map(|m| m.sent_at)
    }
}

/// Ordering for thread listings: most recent `lastMessage.sentAt` first.
///
/// Threads that never received a message sort after all active threads,
/// newest created first among themselves.
pub fn recency_cmp(a: &MessageThread, b: &MessageThread) -> Ordering {
    match (a.last_activity(), b.last_activity()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
    .then_with(|| a.thread_id.cmp(&b.thread_id))
}
