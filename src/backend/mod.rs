//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the messaging core, the
//! WebSocket liveness channel, school records and persistence.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Configuration, state, initialization
//! ├── routes/         - Router assembly
//! ├── store/          - RecordStore/MessageStore over PostgreSQL or memory
//! ├── messaging/      - Threads, message log, messaging handlers
//! ├── liveness/       - Connection registry, heartbeat, WebSocket endpoint
//! ├── school/         - CRUD collections and dashboards
//! ├── auth/           - Login, JWT, password hashing
//! ├── middleware/     - Bearer-token authentication
//! └── error/          - BackendError and HTTP mapping
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the record store, the messaging
//! service, the connection registry and the configuration. Each part is
//! reachable on its own through `FromRef`.
//!
//! # Error Handling
//!
//! Handlers return `ApiResult<T>`; every `BackendError` renders as
//! `{"error": <message>, "status": <code>}`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Persistence
pub mod store;

/// Direct messaging between students and teachers
pub mod messaging;

/// WebSocket presence and heartbeat
pub mod liveness;

/// School collections and dashboards
pub mod school;

/// Authentication and user lookup
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::create_app;
