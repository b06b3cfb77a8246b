//! # byline_rss
//!
//! Generates unofficial RSS feeds from Yahoo!ニュース個人 author pages.
//!
//! ## Features
//!
//! - Fetches each author's listing page (`https://news.yahoo.co.jp/byline/<key>`)
//! - Extracts title, link, summary, publish time and thumbnail of every article,
//!   resolving the site's year-less dates at Japan Standard Time
//! - Writes one RSS 2.0 feed per author, or merges all authors into a single
//!   feed ordered by recency
//! - Waits between requests and gives up after repeated failures
//!
//! ## Usage
//!
//! ```sh
//! byline_rss -o feed.rss yamadataro suzukihanako
//! byline_rss -f authors.txt -d ./feeds
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: Download the listing page of each author key, one at a time
//! 2. **Extraction**: Map the HTML to page metadata and entries
//! 3. **Validation**: Drop pages that lack an author, title or canonical URL
//! 4. **Output**: Render RSS per author, or merge and render once
//!
//! The exit code is 0 when every key succeeded and 1 otherwise.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod assemble;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod pubdate;
mod scrapers;
mod utils;

use cli::Cli;
use outputs::handlers::{DirectoryOutput, Output, SingleFileOutput};
use scrapers::byline::HttpFetcher;
use scrapers::layout::{Layout, Selectors};
use utils::{collect_author_keys, ensure_writable_dir, read_keys_file};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so that a feed written to stdout stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("byline_rss starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref())?;
    let wait = Duration::from_secs(args.wait.unwrap_or(config.wait));

    // ---- Author keys ----
    let file_keys = match &args.keys_file {
        Some(path) => read_keys_file(path).await?,
        None => Vec::new(),
    };
    let keys = collect_author_keys(file_keys, args.keys);
    if keys.is_empty() {
        error!("No valid author keys given");
        return Ok(ExitCode::FAILURE);
    }
    info!(count = keys.len(), "Author keys to process");

    // ---- Scraper & output setup ----
    let selectors = if config.layout == Layout::default() {
        Selectors::byline()?
    } else {
        info!("Using layout from config file");
        Selectors::compile(&config.layout)?
    };
    let fetcher = HttpFetcher::new(
        &config.base_url,
        &config.user_agent,
        Duration::from_secs(config.timeout_secs),
    )?;

    let mut output = match args.directory {
        Some(dir) => {
            if let Err(e) = ensure_writable_dir(&dir).await {
                error!(
                    path = %dir.display(),
                    error = %e,
                    "Output directory is not writable (fix perms or choose a different path)"
                );
                return Err(e);
            }
            Output::Directory(DirectoryOutput::new(dir))
        }
        None => Output::Single(SingleFileOutput::new(args.output)),
    };

    // ---- Fetch, extract, validate, hand over ----
    let summary = pipeline::run(&fetcher, &selectors, &keys, wait, &mut output).await;

    // ---- Final output ----
    // An aborted run writes nothing.
    let finish_ok = if summary.aborted {
        false
    } else {
        match output.finish().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to write feed");
                false
            }
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Execution complete"
    );

    Ok(summary.exit_code(finish_ok))
}
