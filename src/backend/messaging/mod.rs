//! Messaging Module
//!
//! Direct messages between a student and a teacher, grouped into one thread
//! per unordered pair of users.
//!
//! # Module Structure
//!
//! ```text
//! messaging/
//! ├── mod.rs        - Module exports and documentation
//! ├── directory.rs  - User lookup across the student and teacher collections
//! ├── threads.rs    - Thread registry (get-or-create, summaries, listing)
//! ├── log.rs        - Message log (append, conversation, recent, read state)
//! ├── service.rs    - MessagingService orchestrating the above
//! └── handlers.rs   - HTTP handlers under /api/messages
//! ```
//!
//! Every message lands in exactly one thread, the thread id is derived from
//! the two user ids, and a thread's `lastMessage` mirrors the newest message
//! written through the service.

pub mod directory;
pub mod handlers;
pub mod log;
pub mod service;
pub mod threads;

pub use directory::Directory;
pub use log::MessageLog;
pub use service::{MessagingError, MessagingService, MessagingSettings};
pub use threads::ThreadRegistry;
