//! Job posting records discovered by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One discovered job posting.
///
/// Records are created fresh on every pipeline run; nothing about an
/// individual posting is persisted. `posted_at` is only present when some
/// parsing strategy managed to recover a date, and the freshness filter
/// guarantees it is present on every record the pipeline emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Posting title as shown on the listing
    pub title: String,

    /// Canonical absolute URL of the job detail page
    pub link: String,

    /// Best-effort location text, may be empty
    #[serde(default)]
    pub location: String,

    /// The raw phrase that yielded the parsed date, or empty
    #[serde(default)]
    pub posted_text: String,

    /// Normalized posting timestamp (UTC), if any strategy succeeded
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a record with the two mandatory fields.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            location: String::new(),
            posted_text: String::new(),
            posted_at: None,
        }
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the raw posted text.
    pub fn with_posted_text(mut self, text: impl Into<String>) -> Self {
        self.posted_text = text.into();
        self
    }

    /// Set the parsed posting timestamp.
    pub fn with_posted_at(mut self, posted_at: DateTime<Utc>) -> Self {
        self.posted_at = Some(posted_at);
        self
    }

    /// Identity key for deduplication.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.title, &self.link)
    }
}

/// Deduplicate records by `(title, link)`, keeping the first occurrence.
///
/// First-seen-wins is deliberate: when the same posting shows up in more
/// than one listing source, the earliest strategy's version is kept.
pub fn dedup_records(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert((record.title.clone(), record.link.clone())))
        .collect()
}
