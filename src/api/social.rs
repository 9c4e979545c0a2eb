//! Social graph endpoints
//!
//! Follow/unfollow edges and the following-tracks feed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::dto::{TrackSummary, UserResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::FeedService;
use crate::AppState;

/// POST /follow/:user_id
///
/// Inserts a follow edge unless one already exists for the ordered pair.
/// Self-follow is not rejected.
///
/// # Errors
/// `NotFound` if the target user does not exist;
/// `Conflict` if already following.
pub async fn follow_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .get_user(&user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !state.db.follow_user(&user.id, &user_id).await? {
        return Err(AppError::Conflict(
            "already following this user".to_string(),
        ));
    }

    tracing::debug!(follower = %user.id, followee = %user_id, "Follow edge created");

    Ok(StatusCode::OK)
}

/// DELETE /unfollow/:user_id
///
/// Deletes the matching edge if present.
///
/// # Errors
/// `NotFound` if not following.
pub async fn unfollow_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.db.unfollow_user(&user.id, &user_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}

/// GET /following/tracks
///
/// The feed: tracks owned by the caller's followees, newest-created
/// first, as flat summaries with no pagination.
pub async fn following_tracks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TrackSummary>>, AppError> {
    let feed = FeedService::new(state.db.clone());
    let tracks = feed.following_tracks(&user.id).await?;

    Ok(Json(tracks.iter().map(TrackSummary::from).collect()))
}

/// GET /users/:id/followers
pub async fn get_followers(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    state
        .db
        .get_user(&user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let followers = state.db.get_followers(&user_id).await?;

    Ok(Json(followers.iter().map(UserResponse::from).collect()))
}

/// GET /users/:id/following
pub async fn get_following(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    state
        .db
        .get_user(&user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let following = state.db.get_following(&user_id).await?;

    Ok(Json(following.iter().map(UserResponse::from).collect()))
}
