//! Backend Error Module
//!
//! This module defines the error type returned by HTTP handlers and how the
//! typed errors of the core layers are mapped onto HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse and From impls for core errors
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use schoolhub::backend::error::BackendError;
//! use axum::Json;
//!
//! async fn handler() -> Result<Json<()>, BackendError> {
//!     Err(BackendError::not_found("Thread not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

/// Result alias used by HTTP handlers
pub type ApiResult<T> = Result<T, BackendError>;
