//! Per-key processing loop.
//!
//! Keys are processed strictly one after another: fetch, parse, validate,
//! hand to the output. Successive fetches are spaced by the configured wait,
//! and the run stops as soon as [`MAX_FAILURES`] keys have failed.

use crate::assemble::{check, validate};
use crate::error::Result;
use crate::outputs::handlers::Output;
use crate::scrapers::byline::{FetchPage, parse};
use crate::scrapers::layout::Selectors;
use crate::utils::truncate_for_log;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Number of failed keys that aborts the whole run.
pub const MAX_FAILURES: usize = 2;

/// Outcome of [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// True if the run stopped early because of too many failures.
    pub aborted: bool,
}

impl RunSummary {
    /// True when no key failed, the run was not aborted and the final output
    /// was written (`finish_ok`).
    pub fn succeeded_fully(&self, finish_ok: bool) -> bool {
        !self.aborted && self.failed == 0 && finish_ok
    }

    /// Process exit code: 0 on full success, 1 otherwise.
    pub fn exit_code(&self, finish_ok: bool) -> ExitCode {
        if self.succeeded_fully(finish_ok) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Process every key in order, sending valid feeds to `output`.
///
/// A failing key is logged and counted; it does not stop the run until the
/// failure count reaches [`MAX_FAILURES`]. No failed key is retried.
///
/// The run stops right at the failure that reaches the threshold, even when
/// it is the last key, and reports `aborted`; the caller then skips the final
/// output, so feeds collected before the abort are not written.
#[instrument(level = "info", skip_all, fields(keys = keys.len(), wait_secs = wait.as_secs()))]
pub async fn run<F: FetchPage>(
    fetcher: &F,
    selectors: &Selectors,
    keys: &[String],
    wait: Duration,
    output: &mut Output,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            sleep(wait).await;
        }
        match process_key(fetcher, selectors, key, output).await {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                error!(%key, error = %e, "Author key failed");
                summary.failed += 1;
                if summary.failed >= MAX_FAILURES {
                    error!(
                        failed = summary.failed,
                        skipped = keys.len() - i - 1,
                        "Too many failures; aborting"
                    );
                    summary.aborted = true;
                    break;
                }
            }
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        aborted = summary.aborted,
        "Processed author keys"
    );
    summary
}

async fn process_key<F: FetchPage>(
    fetcher: &F,
    selectors: &Selectors,
    key: &str,
    output: &mut Output,
) -> Result<()> {
    let html = fetcher.fetch(key).await?;
    let data = parse(&html, selectors);
    if !validate(&data) {
        debug!(%key, html = %truncate_for_log(&html, 300), "Page did not match the expected layout");
        return check(&data);
    }
    output.handle_author_feed(key, data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::outputs::handlers::{DirectoryOutput, SingleFileOutput};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages; unknown keys fail with HTTP 404.
    struct StubFetcher {
        pages: HashMap<&'static str, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: &[(&'static str, String)]) -> Self {
            StubFetcher {
                pages: pages.iter().cloned().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl FetchPage for StubFetcher {
        async fn fetch(&self, key: &str) -> Result<String> {
            self.requested.lock().unwrap().push(key.to_string());
            self.pages.get(key).cloned().ok_or(Error::HttpStatus(404))
        }
    }

    fn page(author: &str, dates: &[&str]) -> String {
        let items: String = dates
            .iter()
            .enumerate()
            .map(|(i, date)| {
                format!(
                    r#"<li class="entry"><a class="entryBody" href="https://example.com/{author}/{i}"><dl><dt class="ttl">{author} {i}</dt><dd class="summary">s</dd><dd class="pubdate">{date}</dd></dl></a></li>"#
                )
            })
            .collect();
        format!(
            r#"<html><head><title>{author}の記事一覧 - Yahoo!ニュース</title><link rel="canonical" href="https://news.yahoo.co.jp/byline/{author}"></head><body><div id="athr_al"><ul>{items}</ul></div></body></html>"#
        )
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_all_keys_succeed() {
        let fetcher = StubFetcher::new(&[
            ("a", page("a", &["2021/1/1 9:00"])),
            ("b", page("b", &["2021/2/1 9:00"])),
        ]);
        let selectors = Selectors::byline().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut output = Output::Directory(DirectoryOutput::new(dir.path().to_path_buf()));

        let summary = run(&fetcher, &selectors, &keys(&["a", "b"]), Duration::ZERO, &mut output).await;

        assert_eq!(
            summary,
            RunSummary {
                succeeded: 2,
                failed: 0,
                aborted: false
            }
        );
        assert!(dir.path().join("a.rss").exists());
        assert!(dir.path().join("b.rss").exists());
    }

    #[tokio::test]
    async fn test_run_single_failure_continues() {
        let fetcher = StubFetcher::new(&[("a", page("a", &[])), ("c", page("c", &[]))]);
        let selectors = Selectors::byline().unwrap();
        let mut output = Output::Single(SingleFileOutput::new(None));

        let summary = run(&fetcher, &selectors, &keys(&["a", "missing", "c"]), Duration::ZERO, &mut output).await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.aborted);
        assert_eq!(fetcher.requested(), vec!["a", "missing", "c"]);
    }

    #[tokio::test]
    async fn test_run_aborts_after_second_failure() {
        let fetcher = StubFetcher::new(&[("ok", page("ok", &[]))]);
        let selectors = Selectors::byline().unwrap();
        let mut output = Output::Single(SingleFileOutput::new(None));

        let summary = run(
            &fetcher,
            &selectors,
            &keys(&["x", "ok", "y", "never"]),
            Duration::ZERO,
            &mut output,
        )
        .await;

        assert!(summary.aborted);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(fetcher.requested(), vec!["x", "ok", "y"]);
    }

    #[tokio::test]
    async fn test_run_invalid_page_counts_as_failure() {
        let fetcher = StubFetcher::new(&[(
            "nolayout",
            "<html><head><title>Yahoo!ニュース</title></head><body></body></html>".to_string(),
        )]);
        let selectors = Selectors::byline().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut output = Output::Directory(DirectoryOutput::new(dir.path().to_path_buf()));

        let summary = run(&fetcher, &selectors, &keys(&["nolayout"]), Duration::ZERO, &mut output).await;

        assert_eq!(summary.failed, 1);
        assert!(!dir.path().join("nolayout.rss").exists());
    }

    #[tokio::test]
    async fn test_process_key_reports_missing_field() {
        let fetcher = StubFetcher::new(&[(
            "nourl",
            "<html><head><title>a の記事一覧</title></head></html>".to_string(),
        )]);
        let selectors = Selectors::byline().unwrap();
        let mut output = Output::Single(SingleFileOutput::new(None));

        let result = process_key(&fetcher, &selectors, "nourl", &mut output).await;
        assert!(matches!(result, Err(Error::Validation("url"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_between_fetches() {
        let fetcher = StubFetcher::new(&[("a", page("a", &[])), ("b", page("b", &[]))]);
        let selectors = Selectors::byline().unwrap();
        let mut output = Output::Single(SingleFileOutput::new(None));

        let start = tokio::time::Instant::now();
        run(&fetcher, &selectors, &keys(&["a", "b"]), Duration::from_secs(5), &mut output).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_run_aborts_when_last_key_is_second_failure() {
        let fetcher = StubFetcher::new(&[("ok", page("ok", &["2021/1/1 9:00"]))]);
        let selectors = Selectors::byline().unwrap();
        let mut output = Output::Single(SingleFileOutput::new(None));

        let summary = run(&fetcher, &selectors, &keys(&["x", "ok", "y"]), Duration::ZERO, &mut output).await;

        assert_eq!(
            summary,
            RunSummary {
                succeeded: 1,
                failed: 2,
                aborted: true
            }
        );
        assert!(!summary.succeeded_fully(true));
    }

    #[test]
    fn test_summary_all_succeeded() {
        let summary = RunSummary {
            succeeded: 3,
            failed: 0,
            aborted: false,
        };
        assert!(summary.succeeded_fully(true));
        assert_eq!(format!("{:?}", summary.exit_code(true)), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn test_summary_one_failure_not_aborted() {
        let summary = RunSummary {
            succeeded: 2,
            failed: 1,
            aborted: false,
        };
        assert!(!summary.succeeded_fully(true));
        assert_eq!(format!("{:?}", summary.exit_code(true)), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_summary_aborted() {
        let summary = RunSummary {
            succeeded: 1,
            failed: MAX_FAILURES,
            aborted: true,
        };
        assert!(!summary.succeeded_fully(false));
        assert_eq!(format!("{:?}", summary.exit_code(false)), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_summary_finish_failed() {
        let summary = RunSummary {
            succeeded: 2,
            failed: 0,
            aborted: false,
        };
        assert!(!summary.succeeded_fully(false));
        assert_eq!(format!("{:?}", summary.exit_code(false)), format!("{:?}", ExitCode::FAILURE));
    }
}
