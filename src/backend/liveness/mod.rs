//! Liveness Channel
//!
//! Tracks which users currently hold a WebSocket connection and prunes the
//! ones that stop answering heartbeats. It is a presence signal with a
//! best-effort push of new messages, not a reliable transport.
//!
//! # Module Structure
//!
//! ```text
//! liveness/
//! ├── mod.rs        - Module exports and documentation
//! ├── registry.rs   - ConnectionRegistry and the sweep state machine
//! ├── heartbeat.rs  - Periodic sweep task
//! └── socket.rs     - WebSocket handshake, connection loop, presence endpoint
//! ```

pub mod heartbeat;
pub mod registry;
pub mod socket;

pub use heartbeat::spawn_heartbeat;
pub use registry::{ConnectionHandle, ConnectionRegistry, Liveness, Outbound, SweepReport};
pub use socket::{get_presence, ws_handler};
