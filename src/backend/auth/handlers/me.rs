/**
 * Get Current User Handler
 *
 * GET /api/me returns the directory entry of the caller. The route sits
 * behind the authentication middleware, which has already verified the
 * bearer token.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::MeResponse;
use crate::backend::auth::users::find_user_by_id;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - no authenticated user on the request
/// * `404 Not Found` - the token subject no longer exists
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let found = find_user_by_id(state.records.as_ref(), &user.user_id)
        .await
        .map_err(BackendError::from)?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user.user_id);
            BackendError::not_found("User not found")
        })?;

    Ok(Json(MeResponse {
        role: found.role,
        user: found.record.to_json(),
    }))
}
