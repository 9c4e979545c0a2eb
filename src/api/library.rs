//! Like, history, and recommendation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use super::dto::{HistoryEntryResponse, TrackResponse, TrackSummary};
use crate::auth::CurrentUser;
use crate::data::{EntityId, HistoryEntry};
use crate::error::AppError;
use crate::service::FeedService;
use crate::AppState;

/// Like acknowledgement body
#[derive(Debug, serde::Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// POST /tracks/:id/like
///
/// Adds the caller to the track's liked-by set if absent. Idempotent:
/// liking twice leaves the user in the set exactly once.
pub async fn like_track(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    state.db.get_track(&id).await?.ok_or(AppError::NotFound)?;

    state.db.like_track(&user.id, &id).await?;

    Ok(Json(LikeResponse { liked: true }))
}

/// GET /likes
///
/// Tracks the caller has liked, most recently liked first.
pub async fn liked_tracks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TrackResponse>>, AppError> {
    let tracks = state.db.get_liked_tracks(&user.id).await?;

    Ok(Json(
        tracks
            .iter()
            .map(|t| TrackResponse::new(t, &state.storage))
            .collect(),
    ))
}

/// POST /tracks/:id/history
///
/// Appends a history entry with the current timestamp, unconditionally;
/// repeated plays produce repeated rows.
pub async fn add_to_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.db.get_track(&id).await?.ok_or(AppError::NotFound)?;

    let entry = HistoryEntry {
        id: EntityId::new().0,
        user_id: user.id,
        track_id: id,
        played_at: Utc::now(),
    };
    state.db.insert_history(&entry).await?;

    Ok(StatusCode::CREATED)
}

/// GET /history
///
/// The caller's listening history, most recent first.
pub async fn get_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<HistoryEntryResponse>>, AppError> {
    let entries = state.db.get_history(&user.id).await?;

    Ok(Json(entries.iter().map(HistoryEntryResponse::from).collect()))
}

/// GET /recommendations
///
/// Placeholder ranking (see `FeedService::recommendations`); the real
/// algorithm is an open question.
pub async fn recommendations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TrackSummary>>, AppError> {
    let feed = FeedService::new(state.db.clone());
    let tracks = feed.recommendations(&user.id).await?;

    Ok(Json(tracks.iter().map(TrackSummary::from).collect()))
}
