//! Utility functions for author keys, log formatting and output directories.
//!
//! - Author key validation and key-list file reading
//! - String truncation for logging
//! - File system validation for the per-author output directory

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Author keys are used both as a URL path segment and as a file name, so
/// only this conservative character set is accepted.
static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9]+$").expect("author key pattern is valid"));

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"#.*").expect("comment pattern is valid"));

/// Return true if `key` is acceptable as an author key.
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Read author keys from the lines of a key-list file.
///
/// `#` starts a comment running to the end of the line. Surrounding
/// whitespace is trimmed and blank lines are skipped.
pub fn read_keys_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| COMMENT.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Read author keys from a key-list file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_keys_file(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let text = fs::read_to_string(path).await?;
    let keys = read_keys_from_lines(&text);
    info!(count = keys.len(), "Read author keys from file");
    Ok(keys)
}

/// Combine keys from a file and from the command line.
///
/// File keys come first. Duplicates are dropped keeping the first occurrence,
/// and keys failing [`is_valid_key`] are dropped with a warning.
pub fn collect_author_keys(file_keys: Vec<String>, cli_keys: Vec<String>) -> Vec<String> {
    let (valid, invalid): (Vec<String>, Vec<String>) = file_keys
        .into_iter()
        .chain(cli_keys)
        .unique()
        .partition(|key| is_valid_key(key));
    if !invalid.is_empty() {
        warn!(keys = %invalid.join(", "), "Ignoring invalid author keys");
    }
    valid
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary within `max` bytes,
/// with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// A missing directory is created, with a warning, then a scratch file is
/// created and removed to check permissions.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        warn!("Output directory does not exist; creating it");
    }
    fs::create_dir_all(path).await?;
    let check_path = path.join("..__write_check__");
    match stdfs::File::create(&check_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&check_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("yamadataro"));
        assert!(is_valid_key("kobayashi-mariko-01"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc"));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("with space"));
        assert!(!is_valid_key("山田"));
    }

    #[test]
    fn test_read_keys_from_lines() {
        let text = "# authors\nyamadataro\n\n  suzukihanako  # news\n#disabled\n\tsato-ichiro\n";
        assert_eq!(
            read_keys_from_lines(text),
            vec!["yamadataro", "suzukihanako", "sato-ichiro"]
        );
    }

    #[test]
    fn test_collect_author_keys_order_and_dedup() {
        let keys = collect_author_keys(
            vec!["b".to_string(), "a".to_string()],
            vec!["a".to_string(), "c".to_string(), "b".to_string()],
        );
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_collect_author_keys_drops_invalid() {
        let keys = collect_author_keys(vec![], vec!["ok".to_string(), "bad/key".to_string()]);
        assert_eq!(keys, vec!["ok"]);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // Each character is three bytes in UTF-8.
        let result = truncate_for_log("記事一覧", 4);
        assert_eq!(result, "記…(+9 bytes)");
    }

    #[tokio::test]
    async fn test_read_keys_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.txt");
        std::fs::write(&path, "one\n# two\nthree\n").unwrap();
        assert_eq!(read_keys_file(&path).await.unwrap(), vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("feeds").join("rss");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__write_check__").exists());
    }
}
