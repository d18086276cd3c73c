//! Concurrent collection of postings from all configured sources.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::adapters::{FetchContext, JobSource};
use crate::error::AppError;
use crate::models::{JobPosting, SourceFailure};

/// Result of the collect stage.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Valid postings from every source that succeeded
    pub postings: Vec<JobPosting>,

    /// Number of sources attempted
    pub source_total: usize,

    /// Sources that failed this run
    pub failures: Vec<SourceFailure>,
}

/// Fetch postings from all sources concurrently, bounded by `concurrency`.
///
/// Each source runs under its own deadline; a slow or failing source is
/// recorded as a failure and never blocks the rest of the run.
pub async fn collect_postings(
    sources: &[Box<dyn JobSource>],
    ctx: &FetchContext,
    source_timeout: Duration,
    concurrency: usize,
) -> CollectOutcome {
    let mut outcome = CollectOutcome {
        source_total: sources.len(),
        ..CollectOutcome::default()
    };

    let mut source_stream = stream::iter(sources)
        .map(|source| async move {
            let platform = source.platform();
            log::info!("Fetching {}...", platform);

            let result = match tokio::time::timeout(source_timeout, source.fetch(ctx)).await {
                Ok(result) => result,
                Err(_) => Err(AppError::adapter(
                    platform,
                    format!("timed out after {}s", source_timeout.as_secs()),
                )),
            };
            (platform, result)
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((platform, result)) = source_stream.next().await {
        match result {
            Ok(postings) => {
                let fetched = postings.len();
                let mut valid: Vec<JobPosting> =
                    postings.into_iter().filter(|p| p.is_valid()).collect();
                if valid.len() < fetched {
                    log::debug!(
                        "{}: dropped {} postings missing required fields",
                        platform,
                        fetched - valid.len()
                    );
                }

                log::info!("Found {} postings from {}", valid.len(), platform);
                outcome.postings.append(&mut valid);
            }
            Err(error) => {
                log::error!("Error fetching {}: {}", platform, error);
                outcome.failures.push(SourceFailure {
                    platform: platform.to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    log::info!(
        "Total postings collected: {} ({}/{} sources succeeded)",
        outcome.postings.len(),
        outcome.source_total - outcome.failures.len(),
        outcome.source_total
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::Config;
    use async_trait::async_trait;

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

    fn posting(source: &str, title: &str, link: &str) -> JobPosting {
        JobPosting::new(source, title, "Acme", "Pune", link)
    }

    fn test_ctx() -> FetchContext {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 0;
        FetchContext::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let sources: Vec<Box<dyn JobSource>> = vec![
            Box::new(FixedSource {
                name: "Good",
                postings: vec![posting("Good", "DevOps Engineer", "https://g.example/1")],
            }),
            Box::new(FailingSource),
        ];

        let outcome =
            collect_postings(&sources, &test_ctx(), Duration::from_secs(5), 2).await;

        assert_eq!(outcome.source_total, 2);
        assert_eq!(outcome.postings.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].platform, "Broken");
    }

    #[tokio::test]
    async fn test_invalid_postings_are_dropped() {
        let mut incomplete = posting("Good", "SRE", "https://g.example/2");
        incomplete.company = String::new();

        let sources: Vec<Box<dyn JobSource>> = vec![Box::new(FixedSource {
            name: "Good",
            postings: vec![
                posting("Good", "DevOps Engineer", "https://g.example/1"),
                incomplete,
            ],
        })];

        let outcome =
            collect_postings(&sources, &test_ctx(), Duration::from_secs(5), 1).await;
        assert_eq!(outcome.postings.len(), 1);
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        struct SlowSource;

        #[async_trait]
        impl JobSource for SlowSource {
            fn platform(&self) -> &'static str {
                "Slow"
            }

            async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<JobPosting>> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            }
        }

        let sources: Vec<Box<dyn JobSource>> = vec![Box::new(SlowSource)];
        let outcome =
            collect_postings(&sources, &test_ctx(), Duration::from_millis(50), 1).await;

        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].message.contains("timed out"));
    }
}
