//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
///
/// ULIDs sort lexicographically in creation order, which is what lets
/// feed queries use `ORDER BY id DESC` as a recency proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

fn generator() -> &'static Mutex<ulid::Generator> {
    static GENERATOR: OnceLock<Mutex<ulid::Generator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(ulid::Generator::new()))
}

impl EntityId {
    /// Generate a new ULID.
    ///
    /// Monotonic within this process, so IDs minted in the same
    /// millisecond still sort in creation order.
    pub fn new() -> Self {
        let mut gen = generator().lock().unwrap_or_else(|e| e.into_inner());
        match gen.generate() {
            Ok(ulid) => Self(ulid.to_string()),
            // Random-part overflow within one millisecond
            Err(_) => Self(ulid::Ulid::new().to_string()),
        }
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// The password hash never leaves the data layer; API responses use
/// `UserResponse` instead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    /// bcrypt hash, never serialized to clients
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Track
// =============================================================================

/// An uploaded audio item with metadata and an owning user
///
/// The audio bytes live in media storage; `audio_key` is the storage
/// reference. The owner is stamped at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Storage key for the audio file (relative to the media dir)
    pub audio_key: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Playlist
// =============================================================================

/// A named, owned, unordered multiset of tracks
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Playlist membership row
///
/// Duplicates are allowed: adding the same track twice produces two rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaylistTrack {
    pub id: String,
    pub playlist_id: String,
    pub track_id: String,
}

// =============================================================================
// Likes, history, follow graph
// =============================================================================

/// Like relationship (user, track), unique per pair
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackLike {
    pub user_id: String,
    pub track_id: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only listening history entry
///
/// Repeated plays of the same track produce repeated rows by design.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub track_id: String,
    pub played_at: DateTime<Utc>,
}

/// Directed social relationship from follower to followee
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub id: String,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}
