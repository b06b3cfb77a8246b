//! Data models for author listing pages and the feeds built from them.
//!
//! - [`Entry`]: one article reference extracted from a listing page
//! - [`FeedData`]: everything needed to render one feed, either a single
//!   author's page or a merge of several authors
//! - [`PageMeta`]: document-level metadata of one listing page
//!
//! None of these types expose mutating methods. They are built once by the
//! extraction or merge stage and then moved along the pipeline.

use chrono::{DateTime, FixedOffset};

/// One article reference as listed on an author page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute link to the article.
    pub url: Option<String>,
    /// Title with inline markup flattened to plain text.
    pub title: Option<String>,
    /// Excerpt with inline markup flattened to plain text.
    pub summary: Option<String>,
    /// Publish time at UTC+9. Absent when the listed date is unparseable.
    pub pubdate: Option<DateTime<FixedOffset>>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
}

/// Document-level metadata of a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Text of the `<title>` element, verbatim.
    pub title: Option<String>,
    /// Author display name taken from the head title.
    pub author: Option<String>,
    /// `content` of the meta description tag.
    pub description: Option<String>,
    /// `href` of the canonical link tag.
    pub canonical_url: Option<String>,
}

/// A feed before serialization.
///
/// `entries` keep extraction order for a single author and recency order
/// after [`crate::assemble::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedData {
    pub title: Option<String>,
    /// Canonical link of the feed.
    pub url: Option<String>,
    /// Author display name, or a comma-separated list for merged feeds.
    pub author: Option<String>,
    pub description: Option<String>,
    pub entries: Vec<Entry>,
}

impl FeedData {
    /// Combine page metadata with the entries extracted from the same page.
    pub fn from_page(meta: PageMeta, entries: Vec<Entry>) -> Self {
        FeedData {
            title: meta.title,
            url: meta.canonical_url,
            author: meta.author,
            description: meta.description,
            entries,
        }
    }

    /// Most recent publish time among the entries, if any entry is dated.
    pub fn latest_pubdate(&self) -> Option<DateTime<FixedOffset>> {
        self.entries.iter().filter_map(|e| e.pubdate).max()
    }
}
