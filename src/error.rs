//! Error type shared by the fetch, extraction, assembly and output stages.
//!
//! Entry-level anomalies never show up here: a partially broken entry degrades
//! to absent fields instead of an error.

use thiserror::Error;

/// Errors that can occur while turning one author page into a feed.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level error (DNS, connection, TLS, timeout, body decoding)
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The configured base URL cannot be combined with an author key
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A selector in the layout table does not parse
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    /// The author title suffix could not be turned into a pattern
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// Page data lacks a field required to identify the feed
    #[error("page data is missing its {0}")]
    Validation(&'static str),
    /// The channel owner is mandatory in the rendered feed
    #[error("author is required to render a feed")]
    MissingAuthor,
    /// Merging needs at least two feeds
    #[error("merge needs at least two feeds, got {0}")]
    NotEnoughFeeds(usize),
    /// XML writer failure
    #[error("XML error: {0}")]
    Xml(String),
    /// File system error while reading keys or writing feeds
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
    /// Configuration parsed but holds an unusable value
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
