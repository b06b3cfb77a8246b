//! Scraping of author listing pages.
//!
//! | Module | Role |
//! |--------|------|
//! | [`byline`] | Fetches an author page and extracts its metadata and entries |
//! | [`layout`] | Selector table describing where each field lives in the markup |
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Fetching**: download the listing page HTML of one author key
//! 2. **Extraction**: map the HTML to a [`crate::models::FeedData`]
//!
//! Extraction is a pure function of the HTML and never fails; anomalies in
//! one entry only leave that entry's fields absent.

pub mod byline;
pub mod layout;
