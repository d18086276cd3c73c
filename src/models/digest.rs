//! Digest and run-level reporting structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::JobPosting;

/// A posting annotated with extracted keywords and skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestEntry {
    pub posting: JobPosting,

    /// Top keywords from the description, frequency-ranked
    pub keywords: Vec<String>,

    /// Technical skills mentioned in the description
    pub skills: Vec<String>,
}

/// The set of new postings for one run, in stable input order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    pub fn new(entries: Vec<DigestEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A source that failed during collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFailure {
    pub platform: String,
    pub message: String,
}

/// Statistics for a single run, written to stats.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Total postings fetched across all sources (before dedup)
    pub fetched_count: usize,

    /// Postings surfaced in the digest (after dedup)
    pub new_count: usize,

    /// Number of sources attempted
    pub source_total: usize,

    /// Sources that failed this run
    pub source_failures: Vec<SourceFailure>,
}

/// Terminal status of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every id was already in the store; nothing was sent
    NoNewPostings,

    /// Digest delivered (or written, in dry-run mode)
    Sent { new_count: usize },

    /// Digest delivered, but some sources failed this run
    SentWithSourceFailures {
        new_count: usize,
        failed_sources: usize,
    },
}

impl RunStatus {
    /// Process exit code: 0 for clean runs, 2 for partial source failures.
    /// Fatal errors surface as `Err` from the pipeline instead.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoNewPostings | Self::Sent { .. } => 0,
            Self::SentWithSourceFailures { .. } => 2,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub stats: RunStats,
}
