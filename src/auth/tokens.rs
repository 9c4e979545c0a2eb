//! Bearer token issuance and verification
//!
//! HS256-signed JWTs carrying the user ID as subject. Login issues an
//! access/refresh pair; the `kind` claim keeps the two roles apart so a
//! refresh token cannot authenticate a request and vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

const KIND_ACCESS: &str = "access";
const KIND_REFRESH: &str = "refresh";

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// "access" or "refresh"
    pub kind: String,
}

/// Access/refresh token pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn encode_token(user_id: &str, kind: &str, ttl_seconds: i64, secret: &str) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        kind: kind.to_owned(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

fn decode_token(token: &str, expected_kind: &str, secret: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if data.claims.kind != expected_kind {
        return Err(AppError::Unauthorized);
    }

    Ok(data.claims)
}

/// Issue a fresh access/refresh pair for a user
pub fn issue_token_pair(user_id: &str, auth: &AuthConfig) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: encode_token(
            user_id,
            KIND_ACCESS,
            auth.access_token_ttl,
            &auth.token_secret,
        )?,
        refresh_token: encode_token(
            user_id,
            KIND_REFRESH,
            auth.refresh_token_ttl,
            &auth.token_secret,
        )?,
    })
}

/// Verify an access token, returning its claims
///
/// # Errors
/// `Unauthorized` if the token is malformed, expired, badly signed,
/// or is a refresh token.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode_token(token, KIND_ACCESS, secret)
}

/// Verify a refresh token, returning its claims
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode_token(token, KIND_REFRESH, secret)
}
