/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/login.
 *
 * # Authentication Process
 *
 * 1. Look up the email among students, then teachers
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Unknown email and wrong password answer the same 400 `Invalid credentials`
 * - User passwords are never returned in responses
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{find_user_by_email, verify_password};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - unknown email, wrong password or malformed body
/// * `500 Internal Server Error` - store or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "sam@school.test",
///   "password": "secret"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "message": "Login successful",
///   "role": "student",
///   "userId": "4f1c...",
///   "name": "Sam",
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = body?;
    tracing::info!("Login request for: {}", request.email);

    let user = find_user_by_email(state.records.as_ref(), &request.email)
        .await
        .map_err(BackendError::from)?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            BackendError::invalid_input(INVALID_CREDENTIALS)
        })?;

    let valid = user
        .password_hash()
        .is_some_and(|hash| verify_password(&request.password, hash));
    if !valid {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(BackendError::invalid_input(INVALID_CREDENTIALS));
    }

    let token = create_token(
        &state.config.jwt_secret,
        &user.participant(),
        state.config.token_ttl(),
    )
    .map_err(|e| BackendError::internal(format!("Failed to create token: {}", e)))?;

    tracing::info!("User logged in successfully: {} ({})", user.record.id, user.role);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        role: user.role,
        user_id: user.record.id.clone(),
        name: user.name().to_string(),
        token,
    }))
}
