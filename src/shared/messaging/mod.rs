//! Messaging Module
//!
//! This module contains the data structures for direct messaging:
//!
//! - `Message` - A single message in the message log
//! - `MessageThread` - The conversation between two users, with a
//!   denormalized summary of its latest message
//!
//! # Usage
//!
//! ```rust
//! use schoolhub::shared::messaging::{derive_thread_id, Message, MessageThread};
//!
//! assert_eq!(derive_thread_id("b", "a"), derive_thread_id("a", "b"));
//! ```

pub mod message;
pub mod thread;

// Re-export all types
pub use message::{
    LiveEvent, MarkReadRequest, MarkReadResponse, Message, PresenceResponse,
    SendMessageRequest, ThreadMessageRequest, ThreadRequest,
};
pub use thread::{derive_thread_id, recency_cmp, LastMessage, MessageThread, THREAD_ID_SEPARATOR};
