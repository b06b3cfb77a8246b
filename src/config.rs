//! Optional YAML configuration.
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```yaml
//! base_url: "https://news.yahoo.co.jp/byline/"
//! wait: 5
//! timeout_secs: 30
//! user_agent: "byline_rss/0.1.0"
//! layout:
//!   entry_list: "#athr_al"
//! ```

use crate::error::{Error, Result};
use crate::scrapers::byline::DEFAULT_BASE_URL;
use crate::scrapers::layout::Layout;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Default number of seconds between two requests to the site.
pub const DEFAULT_WAIT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listing pages live at `base_url` + author key.
    pub base_url: String,
    /// Seconds between requests, overridden by `--wait`.
    pub wait: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: DEFAULT_WAIT_SECS,
            timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for malformed YAML and [`Error::InvalidConfig`] for
    /// a `wait` or `timeout_secs` below one second.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        if config.wait < 1 {
            return Err(Error::InvalidConfig("wait must be at least 1 second".to_string()));
        }
        if config.timeout_secs < 1 {
            return Err(Error::InvalidConfig(
                "timeout_secs must be at least 1 second".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Load the configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config = Config::from_yaml(&text)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}
