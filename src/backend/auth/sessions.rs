/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * The signing secret comes from `ServerConfig::jwt_secret`; tokens carry the
 * user's id, role and display name so handlers and the live channel can
 * identify the caller without a store lookup.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::{Participant, Role};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID (record id in the students or teachers collection)
    pub sub: String,
    pub role: Role,
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    pub fn participant(&self) -> Participant {
        Participant::new(self.sub.clone(), self.name.clone(), self.role)
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - HMAC signing secret
/// * `user` - The authenticated user
/// * `ttl` - How long the token stays valid
pub fn create_token(
    secret: &str,
    user: &Participant,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        role: user.role,
        name: user.name.clone(),
        exp: (now + ttl).timestamp().max(0) as u64,
        iat: now.timestamp().max(0) as u64,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// Fails on a bad signature, a malformed token or an expired `exp`.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
