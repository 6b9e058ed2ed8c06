//! Pipeline orchestration.
//!
//! One run: structured source first, markup fallback, detail-page
//! enrichment, freshness filter, optional cap. Strategy failures degrade
//! to the next fallback; nothing here returns an error.

use serde::Serialize;
use tracing::info;

use crate::enrich::enrich_posted_dates;
use crate::extract::{markup_jobs, structured_jobs};
use crate::fetch::Fetcher;
use crate::freshness::filter_fresh;
use crate::types::{JobRecord, SourceConfig};

/// Which listing strategy produced the run's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    /// The structured search.json endpoint
    Structured,
    /// Rendered listing pages
    Markup,
    /// Neither strategy yielded anything
    Empty,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Fresh, deduplicated job records
    pub jobs: Vec<JobRecord>,

    /// Strategy that produced the records
    pub source: ListingSource,

    /// Records discovered before enrichment and filtering
    pub discovered: usize,

    /// Detail-page fetch attempts spent
    pub detail_fetches: usize,
}

/// Run the whole pipeline against the target site.
///
/// The structured strategy's query variants are first-success-wins; the
/// markup fallback instead unions records across all of its listing pages.
pub async fn fetch_jobs(fetcher: &dyn Fetcher, config: &SourceConfig) -> RunOutcome {
    let mut jobs = structured_jobs(fetcher, config).await;
    let mut source = ListingSource::Structured;

    if jobs.is_empty() {
        jobs = markup_jobs(fetcher, config).await;
        source = if jobs.is_empty() {
            ListingSource::Empty
        } else {
            ListingSource::Markup
        };
    }

    let discovered = jobs.len();
    info!(count = discovered, source = ?source, "listing discovery complete");

    let detail_fetches = enrich_posted_dates(&mut jobs, fetcher, config.detail_fetch_budget).await;

    let mut jobs = filter_fresh(jobs, config.max_age_days);
    if let Some(cap) = config.max_results {
        jobs.truncate(cap);
    }

    info!(
        fresh = jobs.len(),
        discovered, detail_fetches, "pipeline run complete"
    );

    RunOutcome {
        jobs,
        source,
        discovered,
        detail_fetches,
    }
}
