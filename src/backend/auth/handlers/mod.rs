//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── login.rs    - User authentication handler
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /api/login - credentials → JWT
//! - **`get_me`** - GET /api/me - token → directory entry
//!
//! # Example
//!
//! ```rust,no_run
//! use schoolhub::backend::auth::handlers::{login, get_me};
//! use schoolhub::backend::server::AppState;
//! use axum::{routing::post, routing::get, Router};
//!
//! # fn example() {
//! let router: Router<AppState> = Router::new()
//!     .route("/api/login", post(login))
//!     .route("/api/me", get(get_me));
//! # }
//! ```

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use types::{LoginRequest, LoginResponse, MeResponse};

pub use login::login;
pub use me::get_me;
