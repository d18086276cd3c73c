//! Source adapters: one per job platform.
//!
//! Each adapter fetches raw listings from its platform and normalizes them
//! into [`JobPosting`] records. Adapters are thin and site-specific; parsing
//! is done in synchronous helpers over fetched text so it can be tested
//! against fixture HTML. A failing adapter never aborts the run; the
//! collect stage records the failure and continues with the other sources.

pub mod career_pages;
pub mod cutshort;
pub mod foundit;
pub mod hirist;
pub mod indeed;
pub mod linkedin;
pub mod naukri;
pub mod wellfound;

use std::time::Duration;

use async_trait::async_trait;
use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::{Config, JobPosting, SearchConfig};
use crate::utils::http;

pub use career_pages::CareerPages;
pub use cutshort::Cutshort;
pub use foundit::Foundit;
pub use hirist::Hirist;
pub use indeed::Indeed;
pub use linkedin::LinkedIn;
pub use naukri::Naukri;
pub use wellfound::Wellfound;

/// Shared state handed to every adapter fetch.
pub struct FetchContext {
    pub client: reqwest::Client,
    pub search: SearchConfig,
    request_delay: Duration,
}

impl FetchContext {
    /// Build a fetch context from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::create_client(&config.crawler)?,
            search: config.search.clone(),
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
        })
    }

    /// Politeness pause between requests to the same platform.
    pub async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

/// A job platform adapter.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Platform name used in posting ids and logs.
    fn platform(&self) -> &'static str;

    /// Fetch and normalize postings for the configured search.
    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>>;
}

/// All configured sources, in a fixed presentation order.
pub fn all_sources(config: &Config) -> Vec<Box<dyn JobSource>> {
    vec![
        Box::new(Naukri),
        Box::new(LinkedIn),
        Box::new(Indeed),
        Box::new(Wellfound),
        Box::new(Hirist),
        Box::new(Cutshort),
        Box::new(Foundit),
        Box::new(CareerPages::new(config.career_pages.clone())),
    ]
}

/// Parse a CSS selector, mapping failures to a selector error.
pub(crate) fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Percent-encode a query parameter value.
pub(crate) fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Collect an element's text with normalized whitespace.
pub(crate) fn element_text(el: &scraper::ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase-hyphenate a role title for path-style search URLs.
pub(crate) fn role_slug(role: &str) -> String {
    role.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
