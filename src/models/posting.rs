//! Job posting data structure and identity derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::utils::url::extract_posting_id;

/// Workplace classification derived from the raw location text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationKind {
    Remote,
    Hybrid,
    Onsite,
    Unspecified,
}

impl LocationKind {
    /// Classify a raw location string.
    pub fn classify(location: &str) -> Self {
        if location.trim().is_empty() {
            return Self::Unspecified;
        }

        let lower = location.to_lowercase();
        if ["remote", "work from home", "wfh"]
            .iter()
            .any(|t| lower.contains(t))
        {
            Self::Remote
        } else if ["hybrid", "flexible"].iter().any(|t| lower.contains(t)) {
            Self::Hybrid
        } else {
            Self::Onsite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "Onsite",
            Self::Unspecified => "Not specified",
        }
    }
}

/// A job posting fetched from one source platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobPosting {
    /// Source platform name (e.g., "Naukri", "LinkedIn")
    pub source: String,

    /// Posting title
    pub title: String,

    /// Hiring company
    pub company: String,

    /// Raw location text as shown on the listing
    pub location: String,

    /// Remote/Hybrid/Onsite classification
    pub location_kind: LocationKind,

    /// Job description text (may be empty when the detail page is unavailable)
    pub description: String,

    /// Full URL to apply
    pub link: String,

    /// When this run first observed the posting
    pub first_seen: DateTime<Utc>,
}

impl JobPosting {
    /// Create a posting with the location classified and `first_seen` set to now.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let location = location.into();
        Self {
            source: source.into(),
            title: title.into(),
            company: company.into(),
            location_kind: LocationKind::classify(&location),
            location,
            description: String::new(),
            link: link.into(),
            first_seen: Utc::now(),
        }
    }

    /// Whether the posting carries the fields required to enter the pipeline.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.company.trim().is_empty()
            && !self.link.trim().is_empty()
    }

    /// Platform-qualified identifier, stable across runs.
    ///
    /// Uses the platform-native posting id extracted from the apply URL when
    /// one exists, otherwise a content hash of title, company and link.
    pub fn id(&self) -> String {
        match extract_posting_id(&self.link) {
            Some(native) => format!("{}:{}", self.source, native),
            None => format!("{}:{}", self.source, self.content_hash()),
        }
    }

    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"|");
        hasher.update(self.company.as_bytes());
        hasher.update(b"|");
        hasher.update(self.link.as_bytes());
        hex::encode(&hasher.finalize()[..12])
    }
}
