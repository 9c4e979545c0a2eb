//! Data layer module
//!
//! All persistence lives here:
//! - SQLite database operations
//! - Entity models

mod database;
mod models;

pub use database::{Database, HistoryWithTrack};
pub use models::*;
