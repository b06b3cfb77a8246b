//! Destinations for validated feeds.
//!
//! - [`SingleFileOutput`]: collects every author's feed and writes one
//!   document at the end, merged when there is more than one author
//! - [`DirectoryOutput`]: writes `<key>.rss` per author as soon as it arrives

use crate::assemble::merge;
use crate::error::Result;
use crate::models::FeedData;
use crate::outputs::rss::render;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// Where the run's feeds go.
#[derive(Debug)]
pub enum Output {
    Single(SingleFileOutput),
    Directory(DirectoryOutput),
}

impl Output {
    /// Accept the validated feed of one author key.
    pub async fn handle_author_feed(&mut self, key: &str, data: FeedData) -> Result<()> {
        match self {
            Output::Single(out) => {
                out.handle_author_feed(key, data);
                Ok(())
            }
            Output::Directory(out) => out.handle_author_feed(key, data).await,
        }
    }

    /// Flush anything held back until every key has been processed.
    pub async fn finish(self) -> Result<()> {
        match self {
            Output::Single(out) => out.finish().await,
            Output::Directory(_) => Ok(()),
        }
    }
}

/// Writes one feed to a file, or to stdout when no path is given.
#[derive(Debug, Default)]
pub struct SingleFileOutput {
    path: Option<PathBuf>,
    feeds: Vec<FeedData>,
}

impl SingleFileOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        SingleFileOutput {
            path,
            feeds: Vec::new(),
        }
    }

    pub fn handle_author_feed(&mut self, key: &str, data: FeedData) {
        info!(%key, entries = data.entries.len(), "Queued author feed");
        self.feeds.push(data);
    }

    /// The feed to write: nothing, the only author's feed, or a merge.
    pub fn combined(self) -> Result<Option<FeedData>> {
        match self.feeds.len() {
            0 => Ok(None),
            1 => Ok(self.feeds.into_iter().next()),
            _ => merge(self.feeds).map(Some),
        }
    }

    #[instrument(level = "info", skip_all, fields(path = ?self.path))]
    pub async fn finish(self) -> Result<()> {
        let path = self.path.clone();
        let Some(feed) = self.combined()? else {
            warn!("No valid feeds; nothing written");
            return Ok(());
        };
        let rss = render(&feed)?;
        match path {
            Some(path) => {
                fs::write(&path, &rss).await?;
                info!(path = %path.display(), entries = feed.entries.len(), "Wrote feed");
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&rss).await?;
                stdout.flush().await?;
                info!(entries = feed.entries.len(), "Wrote feed to stdout");
            }
        }
        Ok(())
    }
}

/// Writes each author's feed to its own file in a directory.
#[derive(Debug)]
pub struct DirectoryOutput {
    dir: PathBuf,
}

impl DirectoryOutput {
    pub fn new(dir: PathBuf) -> Self {
        DirectoryOutput { dir }
    }

    /// Path of the feed file for `key`.
    pub fn feed_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.rss", key.replace('/', "_")))
    }

    #[instrument(level = "info", skip(self, data))]
    pub async fn handle_author_feed(&self, key: &str, data: FeedData) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.feed_path(key);
        let rss = render(&data)?;
        fs::write(&path, rss).await?;
        info!(path = %path.display(), entries = data.entries.len(), "Wrote author feed");
        Ok(())
    }
}
