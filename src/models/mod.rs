// src/models/mod.rs

//! Domain models for the aggregator.

mod config;
mod digest;
mod posting;

// Re-export all public types
pub use config::{Config, CrawlerConfig, RetentionConfig, SearchConfig};
pub use digest::{Digest, DigestEntry, RunReport, RunStats, RunStatus, SourceFailure};
pub use posting::{JobPosting, LocationKind};
