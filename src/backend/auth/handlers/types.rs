/**
 * Authentication Handler Types
 *
 * Request and response bodies of the login and current-user handlers.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::Role;

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    /// Plain password, verified against the stored bcrypt hash
    pub password: String,
}

/// Login response
///
/// `role` names the collection the account was found in.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub role: Role,
    pub user_id: String,
    pub name: String,
    /// HS256 JWT for the `Authorization: Bearer` header and the WebSocket handshake
    pub token: String,
}

/// Current user response: the directory entry plus its role
#[derive(Serialize, Debug, Clone)]
pub struct MeResponse {
    pub role: Role,
    pub user: Value,
}
