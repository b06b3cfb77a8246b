//! Markup layout of the byline listing page.
//!
//! Every structural lookup the extractors perform is listed here as a
//! "selector → field" table, so a markup change on the site only needs a new
//! [`Layout`] (for example from the `layout:` block of the config file).

use crate::error::{Error, Result};
use regex::Regex;
use scraper::Selector;
use serde::Deserialize;

/// Selectors describing where each field lives in the page.
///
/// Entry selectors are evaluated relative to one entry element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Container holding the article list.
    pub entry_list: String,
    /// One article inside the container.
    pub entry: String,
    pub entry_link: String,
    pub entry_thumbnail: String,
    pub entry_title: String,
    pub entry_summary: String,
    pub entry_pubdate: String,
    pub page_title: String,
    /// Title element the author name is read from.
    pub page_author: String,
    pub page_description: String,
    pub page_canonical: String,
    /// Head title suffix following the author name.
    pub author_suffix: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            entry_list: "#athr_al".to_string(),
            entry: "li.entry".to_string(),
            entry_link: "a.entryBody".to_string(),
            entry_thumbnail: "dd.thumb img".to_string(),
            entry_title: "dt.ttl".to_string(),
            entry_summary: "dd.summary".to_string(),
            entry_pubdate: "dd.pubdate".to_string(),
            page_title: "title".to_string(),
            page_author: "head title".to_string(),
            page_description: r#"meta[name="description"]"#.to_string(),
            page_canonical: r#"link[rel="canonical"]"#.to_string(),
            author_suffix: "の記事一覧".to_string(),
        }
    }
}

/// How a field's value is read from the element its selector matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// All descendant text nodes, concatenated in document order.
    Text,
    /// The named attribute.
    Attr(&'static str),
}

/// Fields of an [`crate::models::Entry`] read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Url,
    Thumbnail,
    Title,
    Summary,
    Pubdate,
}

impl EntryField {
    pub fn extract(self) -> Extract {
        match self {
            EntryField::Url => Extract::Attr("href"),
            EntryField::Thumbnail => Extract::Attr("src"),
            EntryField::Title | EntryField::Summary | EntryField::Pubdate => Extract::Text,
        }
    }
}

/// Fields of a [`crate::models::PageMeta`] read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageField {
    Title,
    Author,
    Description,
    CanonicalUrl,
}

impl PageField {
    pub fn extract(self) -> Extract {
        match self {
            PageField::Title | PageField::Author => Extract::Text,
            PageField::Description => Extract::Attr("content"),
            PageField::CanonicalUrl => Extract::Attr("href"),
        }
    }
}

/// A [`Layout`] with every selector parsed, ready for extraction.
#[derive(Debug)]
pub struct Selectors {
    pub entry_list: Selector,
    pub entry: Selector,
    pub entry_fields: Vec<(EntryField, Selector)>,
    pub page_fields: Vec<(PageField, Selector)>,
    /// Captures the author name as group 1.
    pub author_pattern: Regex,
}

impl Selectors {
    /// Parse every selector of `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] naming the first selector that does not
    /// parse, or [`Error::Pattern`] if the author suffix cannot be compiled.
    pub fn compile(layout: &Layout) -> Result<Self> {
        Ok(Selectors {
            entry_list: selector(&layout.entry_list)?,
            entry: selector(&layout.entry)?,
            entry_fields: vec![
                (EntryField::Url, selector(&layout.entry_link)?),
                (EntryField::Thumbnail, selector(&layout.entry_thumbnail)?),
                (EntryField::Title, selector(&layout.entry_title)?),
                (EntryField::Summary, selector(&layout.entry_summary)?),
                (EntryField::Pubdate, selector(&layout.entry_pubdate)?),
            ],
            page_fields: vec![
                (PageField::Title, selector(&layout.page_title)?),
                (PageField::Author, selector(&layout.page_author)?),
                (PageField::Description, selector(&layout.page_description)?),
                (PageField::CanonicalUrl, selector(&layout.page_canonical)?),
            ],
            author_pattern: Regex::new(&format!("^(.+){}", regex::escape(&layout.author_suffix)))?,
        })
    }

    /// Selectors for the current markup of the site.
    pub fn byline() -> Result<Self> {
        Self::compile(&Layout::default())
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}
