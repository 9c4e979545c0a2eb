//! API request and response shapes
//!
//! Transport representations of the entities. The password hash never
//! appears here; track audio is exposed as a URL path, not a storage key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{HistoryWithTrack, Playlist, Track, User};
use crate::storage::MediaStorage;

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTrackRequest {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenamePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: String,
}

// =============================================================================
// Responses
// =============================================================================

/// User without credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

/// Full track representation
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// URL path where the audio is served (e.g. "/media/tracks/…")
    pub audio_url: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl TrackResponse {
    pub fn new(track: &Track, storage: &MediaStorage) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            genre: track.genre.clone(),
            audio_url: storage.public_path(&track.audio_key),
            owner_id: track.owner_id.clone(),
            created_at: track.created_at,
        }
    }
}

/// Minimal track representation for feed and recommendation lists
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub id: String,
    pub title: String,
    pub artist: String,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

/// Playlist without its tracks
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Playlist> for PlaylistResponse {
    fn from(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            owner_id: playlist.owner_id.clone(),
            created_at: playlist.created_at,
        }
    }
}

/// Playlist with its track list (duplicates included)
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDetailResponse {
    #[serde(flatten)]
    pub playlist: PlaylistResponse,
    pub tracks: Vec<TrackResponse>,
}

/// History entry with the track it refers to
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryResponse {
    pub id: String,
    pub played_at: DateTime<Utc>,
    pub track: TrackSummary,
}

impl From<&HistoryWithTrack> for HistoryEntryResponse {
    fn from(entry: &HistoryWithTrack) -> Self {
        Self {
            id: entry.id.clone(),
            played_at: entry.played_at,
            track: TrackSummary {
                id: entry.track_id.clone(),
                title: entry.title.clone(),
                artist: entry.artist.clone(),
            },
        }
    }
}
