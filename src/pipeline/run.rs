//! End-to-end orchestration of a digest run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use crate::adapters::{FetchContext, JobSource};
use crate::error::Result;
use crate::models::{Config, RunReport, RunStats, RunStatus};
use crate::notify::Mailer;
use crate::pipeline::{annotate, collect_postings, filter_new};
use crate::render;
use crate::store::SeenStore;

/// Run-level options that do not belong in config.toml.
pub struct RunOptions {
    /// Directory holding the seen store, stats.json, and dry-run output
    pub storage_dir: PathBuf,
}

/// Execute one full digest run: collect, dedup, annotate, render, deliver.
///
/// Seen-store state is committed before any notification is attempted, so a
/// failure after that point can lose one digest but never resend a posting.
/// With no mailer the run is a dry run and the digest is written to
/// `storage_dir/digest.html` instead of being emailed.
pub async fn run_digest(
    config: &Config,
    store: &dyn SeenStore,
    sources: &[Box<dyn JobSource>],
    mailer: Option<&Mailer>,
    options: &RunOptions,
) -> Result<RunReport> {
    let start_time = Utc::now();
    config.validate()?;
    tokio::fs::create_dir_all(&options.storage_dir).await?;

    let ctx = FetchContext::new(config)?;
    let outcome = collect_postings(
        sources,
        &ctx,
        Duration::from_secs(config.crawler.source_timeout_secs),
        config.crawler.max_concurrent,
    )
    .await;

    let fetched_count = outcome.postings.len();
    let new_postings = filter_new(outcome.postings, store).await?;
    let digest = annotate(new_postings);

    if config.retention.days > 0 {
        let removed = store
            .purge_older_than(chrono::Duration::days(i64::from(config.retention.days)))
            .await?;
        if removed > 0 {
            log::info!("Purged {} seen records past retention", removed);
        }
    }

    // Commit dedup state before notification.
    store.flush().await?;

    let stats = RunStats {
        start_time,
        end_time: Utc::now(),
        fetched_count,
        new_count: digest.len(),
        source_total: outcome.source_total,
        source_failures: outcome.failures,
    };
    write_stats(&options.storage_dir, &stats).await;

    if digest.is_empty() {
        log::info!("No new postings found; nothing to send");
        return Ok(RunReport {
            status: RunStatus::NoNewPostings,
            stats,
        });
    }

    let html = render::render(&digest, stats.end_time);
    let subject = format!(
        "Daily DevOps Job Digest - {} new postings ({})",
        digest.len(),
        stats.end_time.format("%Y-%m-%d")
    );

    match mailer {
        Some(mailer) => {
            if let Err(error) = mailer.send(&subject, html.clone()).await {
                // The postings are already marked seen; keep the rendered
                // digest on disk so it is not lost with the failed email.
                persist_digest(&options.storage_dir, &html).await;
                return Err(error);
            }
        }
        None => {
            log::info!("Dry run: skipping email delivery");
            persist_digest(&options.storage_dir, &html).await;
        }
    }

    let status = if stats.source_failures.is_empty() {
        RunStatus::Sent {
            new_count: stats.new_count,
        }
    } else {
        RunStatus::SentWithSourceFailures {
            new_count: stats.new_count,
            failed_sources: stats.source_failures.len(),
        }
    };

    Ok(RunReport { status, stats })
}

/// Write run statistics, best effort.
async fn write_stats(dir: &Path, stats: &RunStats) {
    let path = dir.join("stats.json");
    match serde_json::to_vec_pretty(stats) {
        Ok(bytes) => {
            if let Err(e) = tokio::fs::write(&path, bytes).await {
                log::warn!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => log::warn!("Failed to serialize run stats: {}", e),
    }
}

/// Write the rendered digest, best effort.
async fn persist_digest(dir: &Path, html: &str) {
    let path = dir.join("digest.html");
    if let Err(e) = tokio::fs::write(&path, html).await {
        log::warn!("Failed to write {}: {}", path.display(), e);
    } else {
        log::info!("Digest written to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::JobPosting;
    use crate::store::JsonSeenStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedSource {
        name: &'static str,
        postings: Vec<JobPosting>,
    }

    #[async_trait]
    impl JobSource for FixedSource {
        fn platform(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<JobPosting>> {
            Ok(self.postings.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        fn platform(&self) -> &'static str {
            "Broken"
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<JobPosting>> {
            Err(AppError::adapter("Broken", "connection refused"))
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 0;
        config
    }

    fn sources() -> Vec<Box<dyn JobSource>> {
        vec![Box::new(FixedSource {
            name: "Naukri",
            postings: vec![
                JobPosting::new(
                    "Naukri",
                    "DevOps Engineer",
                    "Acme",
                    "Pune",
                    "https://n.example/view?jobId=100",
                ),
                JobPosting::new(
                    "Naukri",
                    "SRE",
                    "Globex",
                    "Remote",
                    "https://n.example/view?jobId=200",
                ),
            ],
        })]
    }

    #[tokio::test]
    async fn test_dry_run_writes_digest_and_stats() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions {
            storage_dir: tmp.path().to_path_buf(),
        };
        let store = JsonSeenStore::open(tmp.path().join("seen_jobs.json"))
            .await
            .unwrap();

        let report = run_digest(&test_config(), &store, &sources(), None, &options)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Sent { new_count: 2 });
        assert_eq!(report.stats.fetched_count, 2);
        assert!(tmp.path().join("digest.html").exists());
        assert!(tmp.path().join("stats.json").exists());
        assert!(tmp.path().join("seen_jobs.json").exists());
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing_new() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions {
            storage_dir: tmp.path().to_path_buf(),
        };
        let store = JsonSeenStore::open(tmp.path().join("seen_jobs.json"))
            .await
            .unwrap();

        let first = run_digest(&test_config(), &store, &sources(), None, &options)
            .await
            .unwrap();
        assert_eq!(first.status, RunStatus::Sent { new_count: 2 });

        // Reopen the store to prove the marks were persisted.
        let reopened = JsonSeenStore::open(tmp.path().join("seen_jobs.json"))
            .await
            .unwrap();
        let second = run_digest(&test_config(), &reopened, &sources(), None, &options)
            .await
            .unwrap();
        assert_eq!(second.status, RunStatus::NoNewPostings);
    }

    #[tokio::test]
    async fn test_source_failure_is_reported_in_status() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions {
            storage_dir: tmp.path().to_path_buf(),
        };
        let store = JsonSeenStore::open(tmp.path().join("seen_jobs.json"))
            .await
            .unwrap();

        let mut mixed = sources();
        mixed.push(Box::new(FailingSource));

        let report = run_digest(&test_config(), &store, &mixed, None, &options)
            .await
            .unwrap();

        assert_eq!(
            report.status,
            RunStatus::SentWithSourceFailures {
                new_count: 2,
                failed_sources: 1
            }
        );
        assert_eq!(report.status.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_empty_collection_skips_digest_file() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions {
            storage_dir: tmp.path().to_path_buf(),
        };
        let store = JsonSeenStore::open(tmp.path().join("seen_jobs.json"))
            .await
            .unwrap();

        let empty: Vec<Box<dyn JobSource>> = vec![Box::new(FixedSource {
            name: "Naukri",
            postings: Vec::new(),
        })];

        let report = run_digest(&test_config(), &store, &empty, None, &options)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::NoNewPostings);
        assert!(!tmp.path().join("digest.html").exists());
        assert!(tmp.path().join("stats.json").exists());
    }

    #[tokio::test]
    async fn test_unwritable_store_aborts_before_notification() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions {
            storage_dir: tmp.path().to_path_buf(),
        };

        // Open against a path whose parent is later shadowed by a regular
        // file, so the commit write fails.
        let store_path = tmp.path().join("blocker").join("seen_jobs.json");
        let store = JsonSeenStore::open(&store_path).await.unwrap();
        tokio::fs::write(tmp.path().join("blocker"), b"not a dir")
            .await
            .unwrap();

        let result = run_digest(&test_config(), &store, &sources(), None, &options).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(!tmp.path().join("digest.html").exists());
    }
}
