//! Yahoo! News byline (author page) scraper.
//!
//! Each author has a listing page at `https://news.yahoo.co.jp/byline/<key>`
//! showing their recent articles. Scraping is split in two phases:
//!
//! 1. **Fetching**: download the listing page HTML for one author key
//! 2. **Extraction**: turn the HTML into a [`FeedData`] using the selector
//!    table in [`crate::scrapers::layout`]
//!
//! Extraction never fails. A page that does not match the expected layout
//! yields absent fields or no entries, which the validation gate in
//! [`crate::assemble`] then reports.

use crate::error::{Error, Result};
use crate::models::{Entry, FeedData, PageMeta};
use crate::pubdate;
use crate::scrapers::layout::{EntryField, Extract, PageField, Selectors};
use scraper::{ElementRef, Html};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Default location of the author listing pages.
pub const DEFAULT_BASE_URL: &str = "https://news.yahoo.co.jp/byline/";

/// Source of raw listing page HTML.
///
/// Implemented over HTTP by [`HttpFetcher`]; the pipeline only sees this trait.
pub trait FetchPage {
    /// Fetch the listing page of `key` and return its HTML.
    async fn fetch(&self, key: &str) -> Result<String>;
}

/// Fetches listing pages with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Build a fetcher for pages under `base_url`.
    ///
    /// `base_url` should end with `/` so that keys are appended as the last
    /// path segment.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Listing page URL of `key`, with the key percent-encoded as one path
    /// segment.
    pub fn top_url(&self, key: &str) -> Result<Url> {
        Ok(self.base_url.join(&urlencoding::encode(key))?)
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, key: &str) -> Result<String> {
        let url = self.top_url(key)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }
        let html = response.text().await?;
        info!(%url, bytes = html.len(), "Fetched author page");
        Ok(html)
    }
}

/// Parse a listing page, resolving year-less dates against the current year.
pub fn parse(html: &str, selectors: &Selectors) -> FeedData {
    parse_with_reference_year(html, selectors, None)
}

/// Parse a listing page with an explicit year for dates that omit it.
pub fn parse_with_reference_year(
    html: &str,
    selectors: &Selectors,
    reference_year: Option<i32>,
) -> FeedData {
    let document = Html::parse_document(html);
    let meta = extract_page(&document, selectors);
    let entries = extract_entries(&document, selectors, reference_year);
    debug!(
        title = ?meta.title,
        author = ?meta.author,
        entries = entries.len(),
        "Parsed author page"
    );
    FeedData::from_page(meta, entries)
}

/// Read title, author, description and canonical URL of the page.
pub fn extract_page(document: &Html, selectors: &Selectors) -> PageMeta {
    let mut meta = PageMeta::default();
    for (field, selector) in &selectors.page_fields {
        let value = value_of(document.select(selector).next(), field.extract());
        match field {
            PageField::Title => meta.title = value,
            PageField::Author => {
                meta.author = value.and_then(|title| author_from_title(&title, selectors))
            }
            PageField::Description => meta.description = value,
            PageField::CanonicalUrl => meta.canonical_url = value,
        }
    }
    meta
}

/// Extract every entry of the article list, in document order.
///
/// Returns an empty list when the page has no article list container.
pub fn extract_entries(
    document: &Html,
    selectors: &Selectors,
    reference_year: Option<i32>,
) -> Vec<Entry> {
    let Some(container) = document.select(&selectors.entry_list).next() else {
        debug!("No article list container on page");
        return Vec::new();
    };
    container
        .select(&selectors.entry)
        .map(|element| extract_entry(element, selectors, reference_year))
        .collect()
}

fn extract_entry(element: ElementRef<'_>, selectors: &Selectors, reference_year: Option<i32>) -> Entry {
    let (mut url, mut thumbnail, mut title, mut summary, mut pubdate) = (None, None, None, None, None);
    for (field, selector) in &selectors.entry_fields {
        let value = value_of(element.select(selector).next(), field.extract());
        match field {
            EntryField::Url => url = value,
            EntryField::Thumbnail => thumbnail = value,
            EntryField::Title => title = value,
            EntryField::Summary => summary = value,
            EntryField::Pubdate => {
                pubdate = value.and_then(|text| pubdate::resolve(&text, reference_year))
            }
        }
    }
    Entry {
        url,
        title,
        summary,
        pubdate,
        thumbnail,
    }
}

fn value_of(found: Option<ElementRef<'_>>, how: Extract) -> Option<String> {
    let element = found?;
    match how {
        Extract::Text => Some(flatten_text(element)),
        Extract::Attr(name) => element.value().attr(name).map(str::to_string),
    }
}

/// Concatenate every text node under `element` with no separator.
pub fn flatten_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn author_from_title(title: &str, selectors: &Selectors) -> Option<String> {
    selectors
        .author_pattern
        .captures(title)
        .map(|caps| caps[1].to_string())
}
