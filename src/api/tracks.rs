//! Track endpoints
//!
//! Reads are open; mutation requires authentication. Ownership is
//! stamped at upload and immutable afterwards.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use super::dto::{TrackResponse, UpdateTrackRequest};
use crate::auth::CurrentUser;
use crate::data::{EntityId, Track};
use crate::error::AppError;
use crate::AppState;

/// GET /tracks
///
/// Full list, newest first. Open read access.
pub async fn list_tracks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrackResponse>>, AppError> {
    let tracks = state.db.list_tracks().await?;
    let responses = tracks
        .iter()
        .map(|t| TrackResponse::new(t, &state.storage))
        .collect();

    Ok(Json(responses))
}

/// GET /tracks/:id
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackResponse>, AppError> {
    let track = state.db.get_track(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(TrackResponse::new(&track, &state.storage)))
}

/// POST /tracks
///
/// Multipart upload: metadata fields (`title`, `artist`, optional
/// `album`, `genre`) plus an `audio` file part. The caller becomes the
/// owner.
pub async fn create_track(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TrackResponse>), AppError> {
    let mut title: Option<String> = None;
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut genre: Option<String> = None;
    let mut audio: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "title" => title = Some(read_text(field).await?),
            "artist" => artist = Some(read_text(field).await?),
            "album" => album = Some(read_text(field).await?),
            "genre" => genre = Some(read_text(field).await?),
            "audio" => {
                let file_name = field.file_name().unwrap_or("audio.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read audio: {}", e)))?;
                audio = Some((file_name, data.to_vec()));
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let title = require_field(title, "title")?;
    let artist = require_field(artist, "artist")?;
    let (file_name, data) =
        audio.ok_or_else(|| AppError::Validation("no audio file uploaded".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("audio file is empty".to_string()));
    }

    let id = EntityId::new().0;
    let audio_key = state.storage.save_audio(&id, &file_name, &data).await?;

    let track = Track {
        id,
        title,
        artist,
        album: album.filter(|s| !s.is_empty()),
        genre: genre.filter(|s| !s.is_empty()),
        audio_key,
        owner_id: user.id,
        created_at: Utc::now(),
    };
    state.db.insert_track(&track).await?;

    tracing::info!(track_id = %track.id, title = %track.title, "Track uploaded");

    Ok((
        StatusCode::CREATED,
        Json(TrackResponse::new(&track, &state.storage)),
    ))
}

/// PUT /tracks/:id
///
/// Metadata update only; the owner and audio file are untouched.
pub async fn update_track(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    let updated = state
        .db
        .update_track(
            &id,
            &req.title,
            &req.artist,
            req.album.as_deref(),
            req.genre.as_deref(),
        )
        .await?;
    if !updated {
        return Err(AppError::NotFound);
    }

    let track = state.db.get_track(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(TrackResponse::new(&track, &state.storage)))
}

/// DELETE /tracks/:id
///
/// Removes the row (cascading likes, history, and playlist rows) and
/// then the stored audio file, best effort.
pub async fn delete_track(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let track = state.db.get_track(&id).await?.ok_or(AppError::NotFound)?;

    state.db.delete_track(&id).await?;

    if let Err(error) = state.storage.delete(&track.audio_key).await {
        tracing::warn!(%error, key = %track.audio_key, "Failed to remove audio file");
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid field value: {}", e)))
}

fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", name))),
    }
}
