//! Media storage module
//!
//! Uploaded audio files live on local disk under the configured media
//! directory and are served over `/media` by the router.

mod media;

pub use media::MediaStorage;
