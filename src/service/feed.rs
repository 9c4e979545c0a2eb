//! Feed service
//!
//! The social-graph-driven content feed: tracks owned by the users a
//! listener follows, plus the recommendations placeholder.

use std::sync::Arc;

use crate::data::{Database, Track};
use crate::error::AppError;

/// How many recommendations the placeholder returns at most.
const RECOMMENDATION_LIMIT: i64 = 20;

/// Feed service
pub struct FeedService {
    db: Arc<Database>,
}

impl FeedService {
    /// Create new feed service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the following-tracks feed for a user
    ///
    /// Single-hop traversal: the user's followee set filters the track
    /// collection, ordered by track ID descending (newest-created first).
    /// The list is fully materialized; pagination is out of scope.
    ///
    /// Unfollowing takes effect immediately: the next call excludes the
    /// former followee's tracks.
    pub async fn following_tracks(&self, user_id: &str) -> Result<Vec<Track>, AppError> {
        self.db.get_followee_tracks(user_id).await
    }

    /// Get recommended tracks for a user
    ///
    /// Placeholder ranking: tracks the user has not played yet, by global
    /// play count descending. The real algorithm is an open question.
    pub async fn recommendations(&self, user_id: &str) -> Result<Vec<Track>, AppError> {
        self.db
            .get_unplayed_tracks_by_popularity(user_id, RECOMMENDATION_LIMIT)
            .await
    }
}
