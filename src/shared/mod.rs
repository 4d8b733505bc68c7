//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the storage layer, the services and the HTTP surface. All types are
//! designed for JSON serialization with the camelCase field names clients
//! already use.

/// Shared error types
pub mod error;

/// Participant snapshots and user roles
pub mod participant;

/// Messages and message threads
pub mod messaging;

/// School entity shapes and dashboard views
pub mod school;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use messaging::{derive_thread_id, LastMessage, Message, MessageThread};
pub use participant::{Participant, Role};
