//! Validation and merging of extracted feeds.
//!
//! A page must carry an author, a title and a canonical URL to become a
//! feed. Several validated feeds can be merged into a single virtual feed
//! whose entries are ordered by recency.

use crate::error::{Error, Result};
use crate::models::FeedData;
use tracing::{error, warn};

/// Site name used in feed titles.
pub const SITE_NAME: &str = "Yahoo!ニュース個人";

/// Title of the feed owned by `author`.
pub fn channel_title(author: &str) -> String {
    format!("{} - {} (非公式RSS)", author, SITE_NAME)
}

/// Check the fields required for a usable feed identity.
///
/// Empty strings count as missing.
///
/// # Errors
///
/// [`Error::Validation`] naming the first missing field, checked in the order
/// author, title, url.
pub fn check(data: &FeedData) -> Result<()> {
    let required = [
        ("author", &data.author),
        ("title", &data.title),
        ("url", &data.url),
    ];
    for (name, value) in required {
        if value.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Validation(name));
        }
    }
    Ok(())
}

/// Return true if `data` can be rendered as a feed.
///
/// Missing required fields are logged as errors. A page without entries is
/// valid but logged as a warning.
pub fn validate(data: &FeedData) -> bool {
    if let Err(e) = check(data) {
        error!(error = %e, "Page data is invalid");
        return false;
    }
    if data.entries.is_empty() {
        warn!(author = ?data.author, "Page has no entries");
    }
    true
}

/// Merge two or more feeds into one.
///
/// The merged feed is owned by all authors joined with `", "`, links to the
/// first feed's URL, and lists every entry newest first by
/// `(pubdate, title)`. An entry without a publish time counts as older than
/// any dated entry. Entries with equal keys keep their input order.
///
/// # Errors
///
/// [`Error::NotEnoughFeeds`] when given fewer than two feeds.
pub fn merge(feeds: Vec<FeedData>) -> Result<FeedData> {
    if feeds.len() < 2 {
        return Err(Error::NotEnoughFeeds(feeds.len()));
    }

    let authors = feeds
        .iter()
        .map(|feed| feed.author.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ");
    let url = feeds[0].url.clone();

    let mut entries: Vec<_> = feeds.into_iter().flat_map(|feed| feed.entries).collect();
    // `None` orders before `Some`, so undated entries land at the end.
    entries.sort_by(|a, b| (b.pubdate, &b.title).cmp(&(a.pubdate, &a.title)));

    Ok(FeedData {
        title: Some(channel_title(&authors)),
        url,
        author: Some(authors),
        description: Some(String::new()),
        entries,
    })
}
