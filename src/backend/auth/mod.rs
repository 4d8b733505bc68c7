//! Authentication Module
//!
//! Students and teachers log in with the email and password stored on their
//! records and receive a JWT. The token authenticates `/api/me` and the
//! WebSocket handshake.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User lookup across collections, password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── login.rs    - User authentication handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: email and password → students searched, then teachers → JWT returned
//! 2. **Get Me**: JWT → middleware verifies → directory entry returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 and expire after `TOKEN_TTL_HOURS`
//! - `password` fields never leave the server

/// User lookup and password handling
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers
pub mod handlers;

pub use handlers::{get_me, login};
pub use sessions::{create_token, verify_token, Claims};
