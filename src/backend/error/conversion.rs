/**
 * Error Conversion
 *
 * This module provides conversion implementations for backend errors,
 * allowing them to be converted to HTTP responses, and translates the typed
 * errors of the core layers into `BackendError`.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * # Translations
 *
 * - `MessagingError::UserNotFound` / `ThreadNotFound` -> 404
 * - `MessagingError::InvalidContent` / `InvalidParticipants` -> 400
 * - `MessagingError::Forbidden` -> 403
 * - `StoreError` (any) -> 500
 * - `JsonRejection` -> 400
 */

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;
use crate::backend::messaging::MessagingError;
use crate::backend::store::StoreError;

impl IntoResponse for BackendError {
    /// Convert a backend error into an HTTP response
    ///
    /// Server-side failures are logged with their full detail here, the
    /// response carries only the generic message.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        BackendError::internal(err.to_string())
    }
}

impl From<MessagingError> for BackendError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::UserNotFound(_) | MessagingError::ThreadNotFound(_) => {
                BackendError::not_found(err.to_string())
            }
            MessagingError::InvalidContent(_) | MessagingError::InvalidParticipants(_) => {
                BackendError::invalid_input(err.to_string())
            }
            MessagingError::Forbidden { .. } => BackendError::forbidden(err.to_string()),
            MessagingError::Store(store) => store.into(),
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        BackendError::invalid_input(rejection.body_text())
    }
}
