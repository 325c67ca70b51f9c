//! Reddit scraping - collect posts and comments over the public JSON API
//!
//! This is the collection side of the pipeline: search or subreddit listings
//! produce Post records, then each post's comment tree is fetched and
//! flattened. Per-post failures are logged and skipped; a partial corpus is
//! better than none.

pub mod client;
pub mod listing;

pub use client::RedditClient;
pub use listing::{Listing, TimeFilter};
