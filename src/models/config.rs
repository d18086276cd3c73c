//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target roles and locations for the search
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP and fetching behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Seen-store retention settings
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Company career page URLs for the generic adapter
    #[serde(default)]
    pub career_pages: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.roles.is_empty() {
            return Err(AppError::validation("search.roles is empty"));
        }
        if self.search.locations.is_empty() {
            return Err(AppError::validation("search.locations is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.source_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.source_timeout_secs must be > 0",
            ));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            crawler: CrawlerConfig::default(),
            retention: RetentionConfig::default(),
            career_pages: Vec::new(),
        }
    }
}

/// Target roles and locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Role titles to search for
    #[serde(default = "defaults::roles")]
    pub roles: Vec<String>,

    /// Target locations
    #[serde(default = "defaults::locations")]
    pub locations: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            roles: defaults::roles(),
            locations: defaults::locations(),
        }
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Overall deadline for a single source adapter in seconds
    #[serde(default = "defaults::source_timeout")]
    pub source_timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent source fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            source_timeout_secs: defaults::source_timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Seen-store retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Records older than this many days are eligible for purging.
    /// Zero disables purging.
    #[serde(default = "defaults::retention_days")]
    pub days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: defaults::retention_days(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobdigest/1.0)".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn source_timeout() -> u64 {
        120
    }
    pub fn request_delay() -> u64 {
        1500
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Retention defaults
    pub fn retention_days() -> u32 {
        90
    }

    // Search defaults
    pub fn roles() -> Vec<String> {
        vec![
            "DevOps Engineer".to_string(),
            "Junior DevOps Engineer".to_string(),
            "Site Reliability Engineer".to_string(),
            "SRE".to_string(),
            "DevOps Specialist".to_string(),
            "Cloud DevOps Engineer".to_string(),
        ]
    }

    pub fn locations() -> Vec<String> {
        vec![
            "Bengaluru".to_string(),
            "Bangalore".to_string(),
            "Hyderabad".to_string(),
            "Pune".to_string(),
            "NCR".to_string(),
            "Gurgaon".to_string(),
            "Noida".to_string(),
            "Delhi".to_string(),
            "Indore".to_string(),
            "Ahmedabad".to_string(),
            "Jaipur".to_string(),
            "Mumbai".to_string(),
            "Chennai".to_string(),
            "Remote".to_string(),
            "India".to_string(),
        ]
    }
}
