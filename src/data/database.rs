//! SQLite database operations
//!
//! All database access goes through this module.
//! Handlers never touch SQL directly; they call methods on [`Database`].

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
///
/// Every method runs as one implicit transaction; there is no explicit
/// locking or retry logic in the application layer.
pub struct Database {
    pool: Pool<Sqlite>,
}

/// History entry joined with its track metadata, for the history listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryWithTrack {
    pub id: String,
    pub played_at: DateTime<Utc>,
    pub track_id: String,
    pub title: String,
    pub artist: String,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        // Foreign keys must be on for the ON DELETE CASCADE schema to work.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user unless the username is already taken.
    ///
    /// This is atomic at the SQL statement level, so concurrent registrations
    /// of the same username cannot both succeed.
    ///
    /// # Returns
    /// `true` if inserted, `false` if the username already exists.
    pub async fn create_user(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, username, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by username (exact match)
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Insert a new track
    pub async fn insert_track(&self, track: &Track) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tracks (id, title, artist, album, genre, audio_key, owner_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&track.id)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album)
        .bind(&track.genre)
        .bind(&track.audio_key)
        .bind(&track.owner_id)
        .bind(track.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a track by ID
    pub async fn get_track(&self, id: &str) -> Result<Option<Track>, AppError> {
        let track = sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(track)
    }

    /// List all tracks, newest first
    pub async fn list_tracks(&self) -> Result<Vec<Track>, AppError> {
        let tracks = sqlx::query_as::<_, Track>("SELECT * FROM tracks ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(tracks)
    }

    /// Update track metadata.
    ///
    /// The owner is immutable after creation and is deliberately not part
    /// of this statement.
    ///
    /// # Returns
    /// `false` if no track with this ID exists.
    pub async fn update_track(
        &self,
        id: &str,
        title: &str,
        artist: &str,
        album: Option<&str>,
        genre: Option<&str>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tracks SET title = ?, artist = ?, album = ?, genre = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(artist)
        .bind(album)
        .bind(genre)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete a track.
    ///
    /// Playlist memberships, likes, and history rows go with it via
    /// cascading foreign keys.
    ///
    /// # Returns
    /// `false` if no track with this ID exists.
    pub async fn delete_track(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    /// Insert a new playlist
    pub async fn insert_playlist(&self, playlist: &Playlist) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO playlists (id, name, owner_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.owner_id)
        .bind(playlist.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a playlist by ID
    pub async fn get_playlist(&self, id: &str) -> Result<Option<Playlist>, AppError> {
        let playlist = sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(playlist)
    }

    /// List all playlists, newest first
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>, AppError> {
        let playlists = sqlx::query_as::<_, Playlist>("SELECT * FROM playlists ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(playlists)
    }

    /// Rename a playlist
    ///
    /// # Returns
    /// `false` if no playlist with this ID exists.
    pub async fn rename_playlist(&self, id: &str, name: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE playlists SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete a playlist.
    ///
    /// Its membership rows are removed by the cascading foreign key, so the
    /// whole removal is a single atomic statement.
    ///
    /// # Returns
    /// `false` if no playlist with this ID exists.
    pub async fn delete_playlist(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Add a track to a playlist.
    ///
    /// Duplicates are allowed by design; calling this twice for the same
    /// pair produces two membership rows.
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO playlist_tracks (id, playlist_id, track_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(EntityId::new().0)
        .bind(playlist_id)
        .bind(track_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove one membership row for (playlist, track).
    ///
    /// When the track appears twice, only one occurrence is removed.
    ///
    /// # Returns
    /// `false` if the track was not in the playlist.
    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM playlist_tracks
            WHERE id = (
                SELECT id FROM playlist_tracks
                WHERE playlist_id = ? AND track_id = ?
                LIMIT 1
            )
            "#,
        )
        .bind(playlist_id)
        .bind(track_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Get the tracks in a playlist, duplicates included, in insertion order
    pub async fn get_playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, AppError> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.* FROM playlist_tracks pt
            JOIN tracks t ON t.id = pt.track_id
            WHERE pt.playlist_id = ?
            ORDER BY pt.id
            "#,
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Add the user to the track's liked-by set.
    ///
    /// Idempotent: liking an already-liked track is a no-op.
    ///
    /// # Returns
    /// `true` if a new like row was inserted.
    pub async fn like_track(&self, user_id: &str, track_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO track_likes (user_id, track_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(track_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Tracks the user has liked, most recently liked first
    pub async fn get_liked_tracks(&self, user_id: &str) -> Result<Vec<Track>, AppError> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.* FROM track_likes l
            JOIN tracks t ON t.id = l.track_id
            WHERE l.user_id = ?
            ORDER BY l.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }

    /// IDs of users who like a track
    pub async fn get_track_likers(&self, track_id: &str) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM track_likes WHERE track_id = ?",
        )
        .bind(track_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Append a history entry.
    ///
    /// No deduplication: repeated plays produce repeated rows.
    pub async fn insert_history(&self, entry: &HistoryEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO history (id, user_id, track_id, played_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.track_id)
        .bind(entry.played_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// A user's history with track metadata, most recent first.
    ///
    /// Ordered by entry ID descending; ULID timestamps make that the
    /// play order.
    pub async fn get_history(&self, user_id: &str) -> Result<Vec<HistoryWithTrack>, AppError> {
        let entries = sqlx::query_as::<_, HistoryWithTrack>(
            r#"
            SELECT h.id, h.played_at, t.id AS track_id, t.title, t.artist
            FROM history h
            JOIN tracks t ON t.id = h.track_id
            WHERE h.user_id = ?
            ORDER BY h.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // =========================================================================
    // Follow graph
    // =========================================================================

    /// Insert a follow edge unless one already exists for the ordered pair.
    ///
    /// # Returns
    /// `true` if the edge was created, `false` if already following.
    pub async fn follow_user(&self, follower_id: &str, followee_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO follows (id, follower_id, followee_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(EntityId::new().0)
        .bind(follower_id)
        .bind(followee_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete the matching follow edge if present.
    ///
    /// # Returns
    /// `false` if there was no such edge.
    pub async fn unfollow_user(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// IDs of users this user follows
    pub async fn get_followee_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let ids =
            sqlx::query_scalar::<_, String>("SELECT followee_id FROM follows WHERE follower_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Users following `user_id`, newest edge first
    pub async fn get_followers(&self, user_id: &str) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followee_id = ?
            ORDER BY f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Users that `user_id` follows, newest edge first
    pub async fn get_following(&self, user_id: &str) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM follows f
            JOIN users u ON u.id = f.followee_id
            WHERE f.follower_id = ?
            ORDER BY f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    // =========================================================================
    // Feed queries
    // =========================================================================

    /// Tracks owned by the user's followees, newest first.
    ///
    /// Single-hop graph traversal (my followees) feeding a filter over the
    /// track collection; `ORDER BY id DESC` is the recency proxy since no
    /// explicit creation timestamp participates in ordering. Fully
    /// materialized, no pagination.
    pub async fn get_followee_tracks(&self, user_id: &str) -> Result<Vec<Track>, AppError> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.* FROM tracks t
            WHERE t.owner_id IN (
                SELECT followee_id FROM follows WHERE follower_id = ?
            )
            ORDER BY t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }

    /// Tracks the user has not played yet, by global play count descending.
    ///
    /// This is the recommendations fallback; a real ranking algorithm
    /// remains an open question.
    pub async fn get_unplayed_tracks_by_popularity(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Track>, AppError> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.* FROM tracks t
            WHERE t.id NOT IN (SELECT track_id FROM history WHERE user_id = ?)
            ORDER BY (SELECT COUNT(*) FROM history h WHERE h.track_id = t.id) DESC, t.id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tracks)
    }
}
