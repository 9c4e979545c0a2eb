//! Service layer
//!
//! The handlers stay thin; the one piece of real query design
//! (the social feed) lives here.

mod feed;

pub use feed::FeedService;
