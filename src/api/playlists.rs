//! Playlist endpoints
//!
//! All gated on authentication. Creation stamps the caller as owner; no
//! ownership check is enforced on later mutation, so any authenticated
//! user may mutate any playlist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use super::dto::{
    AddTrackRequest, CreatePlaylistRequest, PlaylistDetailResponse, PlaylistResponse,
    RenamePlaylistRequest, TrackResponse,
};
use crate::auth::CurrentUser;
use crate::data::{EntityId, Playlist};
use crate::error::AppError;
use crate::AppState;

/// GET /playlists
pub async fn list_playlists(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<PlaylistResponse>>, AppError> {
    let playlists = state.db.list_playlists().await?;

    Ok(Json(playlists.iter().map(PlaylistResponse::from).collect()))
}

/// POST /playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistResponse>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let playlist = Playlist {
        id: EntityId::new().0,
        name: name.to_string(),
        owner_id: user.id,
        created_at: Utc::now(),
    };
    state.db.insert_playlist(&playlist).await?;

    Ok((StatusCode::CREATED, Json(PlaylistResponse::from(&playlist))))
}

/// GET /playlists/:id
///
/// Includes the track list, duplicates and all.
pub async fn get_playlist(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PlaylistDetailResponse>, AppError> {
    let playlist = state.db.get_playlist(&id).await?.ok_or(AppError::NotFound)?;
    let tracks = state.db.get_playlist_tracks(&id).await?;

    Ok(Json(PlaylistDetailResponse {
        playlist: PlaylistResponse::from(&playlist),
        tracks: tracks
            .iter()
            .map(|t| TrackResponse::new(t, &state.storage))
            .collect(),
    }))
}

/// POST /playlists/:id/add-track
///
/// Adds a membership row. Duplicates are not prevented: adding the same
/// track twice leaves it in the playlist twice.
pub async fn add_track(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddTrackRequest>,
) -> Result<StatusCode, AppError> {
    // Both referenced rows must exist; a clean 404 beats a constraint error
    state.db.get_playlist(&id).await?.ok_or(AppError::NotFound)?;
    state
        .db
        .get_track(&req.track_id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.db.add_track_to_playlist(&id, &req.track_id).await?;

    Ok(StatusCode::OK)
}

/// DELETE /playlists/:id/remove-track/:track_id
///
/// Removes a single occurrence of the track.
pub async fn remove_track(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path((id, track_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.db.get_playlist(&id).await?.ok_or(AppError::NotFound)?;

    if !state.db.remove_track_from_playlist(&id, &track_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}

/// PATCH /playlists/:id/update
pub async fn rename_playlist(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RenamePlaylistRequest>,
) -> Result<Json<PlaylistResponse>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    if !state.db.rename_playlist(&id, name).await? {
        return Err(AppError::NotFound);
    }

    let playlist = state.db.get_playlist(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(PlaylistResponse::from(&playlist)))
}

/// DELETE /playlists/:id/delete
///
/// Membership rows cascade away with the playlist; tracks survive.
pub async fn delete_playlist(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_playlist(&id).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::OK)
}
