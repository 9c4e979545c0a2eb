//! Local-disk media storage
//!
//! Handles save, delete, and URL generation for uploaded audio files.
//! Keys are relative paths like "tracks/01ARZ3....mp3"; the router serves
//! them under `/media/{key}`.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::AppError;

/// Media storage service
///
/// Writes audio files under the media directory and returns storage keys.
pub struct MediaStorage {
    media_dir: PathBuf,
}

impl MediaStorage {
    /// Create new media storage rooted at `media_dir`
    ///
    /// Creates the directory (and the tracks/ prefix) if missing.
    ///
    /// # Errors
    /// Returns error if the directories cannot be created
    pub fn new(media_dir: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(media_dir.join("tracks"))
            .map_err(|e| AppError::Storage(format!("failed to create media dir: {}", e)))?;

        Ok(Self {
            media_dir: media_dir.to_path_buf(),
        })
    }

    /// Save an uploaded audio file
    ///
    /// Stores in the tracks/ prefix under a name derived from the track ID
    /// plus a random suffix, so re-uploading a track never overwrites a
    /// file still referenced elsewhere.
    ///
    /// # Arguments
    /// * `id` - Track ID
    /// * `file_name` - Client-supplied file name (extension is taken from it)
    /// * `data` - File contents
    ///
    /// # Returns
    /// The storage key, e.g. "tracks/01ARZ3...-x7f2.mp3"
    pub async fn save_audio(
        &self,
        id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let ext = audio_extension(file_name);
        let suffix: u32 = rand::thread_rng().gen_range(0x1000..0xFFFF);
        let key = format!("tracks/{}-{:x}.{}", id, suffix, ext);

        let path = self.media_dir.join(&key);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("failed to write {}: {}", key, e)))?;

        Ok(key)
    }

    /// Delete a stored file by key
    ///
    /// Missing files are ignored; the caller treats deletion as best effort.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.media_dir.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "failed to delete {}: {}",
                key, e
            ))),
        }
    }

    /// Public URL path for a storage key
    pub fn public_path(&self, key: &str) -> String {
        format!("/media/{}", key)
    }

    /// Root directory, for mounting the static file service
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }
}

/// Pick a safe file extension from the client-supplied name.
///
/// Anything unrecognized falls back to "bin"; the extension is never
/// taken verbatim from user input.
fn audio_extension(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "mp3",
        Some("ogg") => "ogg",
        Some("oga") => "oga",
        Some("flac") => "flac",
        Some("wav") => "wav",
        Some("m4a") => "m4a",
        Some("aac") => "aac",
        Some("opus") => "opus",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_and_delete_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStorage::new(temp_dir.path()).unwrap();

        let key = storage
            .save_audio("01TRACK", "song.mp3", b"audio-bytes")
            .await
            .unwrap();
        assert!(key.starts_with("tracks/01TRACK-"));
        assert!(key.ends_with(".mp3"));
        assert!(temp_dir.path().join(&key).exists());
        assert_eq!(storage.public_path(&key), format!("/media/{}", key));

        storage.delete(&key).await.unwrap();
        assert!(!temp_dir.path().join(&key).exists());

        // Deleting an absent key is not an error
        storage.delete(&key).await.unwrap();
    }

    #[test]
    fn unknown_extensions_fall_back_to_bin() {
        assert_eq!(audio_extension("track.mp3"), "mp3");
        assert_eq!(audio_extension("track.FLAC"), "flac");
        assert_eq!(audio_extension("../evil.sh"), "bin");
        assert_eq!(audio_extension("noext"), "bin");
    }
}
