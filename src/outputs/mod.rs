//! Output generation for feeds.
//!
//! - [`rss`]: renders a [`crate::models::FeedData`] as an RSS 2.0 document
//! - [`handlers`]: decides where rendered feeds are written
//!
//! # Output Modes
//!
//! ```text
//! byline_rss a b          -> stdout, one feed merging a and b
//! byline_rss -o all.rss a -> all.rss
//! byline_rss -d feeds a b -> feeds/a.rss, feeds/b.rss
//! ```

pub mod handlers;
pub mod rss;
