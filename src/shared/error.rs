//! Shared Error Types
//!
//! Errors raised while decoding or validating request bodies and stored
//! documents. They carry the offending field so the HTTP layer can answer
//! with a precise 400.
//!
//! # Usage
//!
//! ```rust
//! use schoolhub::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "message content cannot be empty");
//! assert_eq!(error.field(), Some("content"));
//! ```
use thiserror::Error;

/// Validation and decoding failures shared by every layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// A field is present but its value is not acceptable
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A required field is absent
    #[error("Missing required field '{field}'")]
    MissingField { field: String },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// The field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SerializationError { .. } => None,
            Self::ValidationError { field, .. } | Self::MissingField { field } => Some(field),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
