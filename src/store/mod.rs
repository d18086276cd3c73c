//! Seen-job store: durable record of previously notified posting ids.
//!
//! The store answers "have I already notified about posting X?" and records
//! new notifications. Records survive process restarts so that daily runs
//! never re-surface a posting.
//!
//! Storage failures are fatal for the run: when the store cannot be read,
//! dedup correctness cannot be guaranteed, so the pipeline aborts before any
//! notification is attempted.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::JsonSeenStore;

/// A previously notified posting id. Created on first observation,
/// never mutated, removed only by an explicit retention purge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenRecord {
    /// Platform-qualified posting id
    pub id: String,

    /// When the posting was first surfaced in a digest
    pub first_seen: DateTime<Utc>,
}

/// Trait for seen-job store backends.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether the id has already been notified about.
    async fn has_seen(&self, id: &str) -> Result<bool>;

    /// Record an id as notified. Idempotent: marking an id already present
    /// is a no-op. Returns true when the id was newly recorded.
    async fn mark_seen(&self, id: &str, timestamp: DateTime<Utc>) -> Result<bool>;

    /// Remove records older than the given age to bound growth.
    /// Ids observed within the retention window are always kept.
    /// Returns the number of records removed.
    async fn purge_older_than(&self, max_age: Duration) -> Result<usize>;

    /// Durably commit pending marks.
    async fn flush(&self) -> Result<()>;

    /// Number of records currently held.
    async fn record_count(&self) -> Result<usize>;
}
