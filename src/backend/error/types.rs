/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 * Core operations return their own typed errors (`MessagingError`,
 * `StoreError`, `SharedError`); they are translated into a `BackendError`
 * at the HTTP boundary (see `conversion`).
 *
 * # Error Kinds
 *
 * | Variant        | Status | Raised when                                   |
 * |----------------|--------|-----------------------------------------------|
 * | `NotFound`     | 404    | entity, user or thread absent                 |
 * | `InvalidInput` | 400    | missing or malformed fields, empty content    |
 * | `Conflict`     | 409    | duplicate unique value (e.g. email)           |
 * | `Unauthorized` | 401    | missing, malformed or expired credentials     |
 * | `Forbidden`    | 403    | acting user is not allowed on the resource    |
 * | `Internal`     | 500    | persistence or other server-side failure      |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use schoolhub::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("Thread not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// The referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The request is missing fields or carries malformed values
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The request collides with existing state
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Credentials are missing or invalid
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The caller is authenticated but not allowed to act on the resource
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Server-side failure; the message is logged, not returned
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Decoding or validation failure from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new internal error
    ///
    /// The message is logged when the error is turned into a response; the
    /// client only sees a generic text.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::MissingField { .. } => StatusCode::BAD_REQUEST,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::InvalidInput { message }
            | Self::Conflict { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message } => message.clone(),
            Self::Internal { .. } | Self::SerializationError(_) => {
                "Internal server error".to_string()
            }
            Self::SharedError(err) => err.to_string(),
        }
    }
}
