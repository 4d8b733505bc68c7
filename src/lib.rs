//! SchoolHub - Main Library
//!
//! Backend of a school-management application: CRUD over students,
//! teachers, classrooms, subjects, documents, exam templates and grades, plus
//! direct messaging between students and teachers with a WebSocket presence
//! channel.
//!
//! # Module Structure
//!
//! - **`shared`** - Serializable domain types
//!   - Participants and roles, messages and threads
//!   - School record shapes and their validation
//!   - `SharedError`
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and routes
//!   - Messaging service and liveness registry
//!   - PostgreSQL and in-memory stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use schoolhub::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
