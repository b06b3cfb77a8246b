//! Command-line interface definitions for byline_rss.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for byline_rss.
///
/// # Examples
///
/// ```sh
/// # One merged feed for two authors on stdout
/// byline_rss yamadataro suzukihanako
///
/// # Keys from a file, one feed per author, 10 seconds between requests
/// byline_rss -f authors.txt -d ./feeds -w 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Author keys to generate feeds for
    #[arg(value_name = "KEY", required_unless_present = "keys_file")]
    pub keys: Vec<String>,

    /// Read author keys from this file, one per line (`#` starts a comment)
    #[arg(short = 'f', long = "keys-file", value_name = "FILE")]
    pub keys_file: Option<PathBuf>,

    /// Write one feed per author into this directory
    #[arg(short, long, value_name = "DIR", conflicts_with = "output")]
    pub directory: Option<PathBuf>,

    /// Write a single feed to this file instead of stdout (authors are merged)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seconds to wait between requests to the site [default: 5]
    #[arg(short, long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub wait: Option<u64>,

    /// Optional path to a config.yaml file
    #[arg(short, long, env = "BYLINE_RSS_CONFIG")]
    pub config: Option<PathBuf>,
}
