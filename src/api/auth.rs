//! Account and session endpoints
//!
//! Registration, login, token refresh, and the current-user view.
//! No rate limiting or lockout; hardening is out of scope.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use super::dto::{LoginRequest, RefreshRequest, RegisterRequest, UserResponse};
use crate::auth::{
    hash_password, issue_token_pair, verify_password, verify_refresh_token, CurrentUser, TokenPair,
};
use crate::data::{EntityId, User};
use crate::error::AppError;
use crate::AppState;

/// POST /register
///
/// Persists a new user row with a hashed password.
///
/// # Errors
/// `Conflict` (409) if the username is already taken.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username must not be empty".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }

    let user = User {
        id: EntityId::new().0,
        username: username.to_string(),
        password_hash: hash_password(&req.password, state.config.auth.bcrypt_cost)?,
        created_at: Utc::now(),
    };

    if !state.db.create_user(&user).await? {
        return Err(AppError::Conflict("username already exists".to_string()));
    }

    tracing::info!(username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /login
///
/// Issues a signed, time-bounded access/refresh token pair.
/// The response does not distinguish "unknown user" from "wrong
/// password"; both are 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let user = state
        .db
        .get_user_by_username(req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let tokens = issue_token_pair(&user.id, &state.config.auth)?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(tokens))
}

/// POST /refresh
///
/// Exchanges a valid refresh token for a fresh token pair.
/// A token naming a since-deleted user is rejected.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let claims = verify_refresh_token(&req.refresh_token, &state.config.auth.token_secret)?;

    let user = state
        .db
        .get_user(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = issue_token_pair(&user.id, &state.config.auth)?;

    Ok(Json(tokens))
}

/// GET /me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
