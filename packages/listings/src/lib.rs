//! Job-listing extraction and date-normalization pipeline.
//!
//! Given raw HTML or JSON from the target careers site (Amazon Jobs), this
//! library produces a deduplicated list of fresh job postings with
//! best-effort posting dates, using a layered fallback strategy:
//! structured JSON → HTML parsing → detail-page enrichment → heuristic
//! date extraction.
//!
//! # Design
//!
//! - Components degrade to "no match" instead of failing a run: fetch and
//!   parse errors stay inside the strategy that hit them.
//! - Each fallback boundary is an explicit `Result`/`Option`, so callers
//!   can tell "tried and failed" from "not attempted".
//! - One run is sequential: no internal parallelism, no retries, a fixed
//!   30-second timeout per request, and a budget on detail-page fetches.
//!
//! # Usage
//!
//! ```rust,ignore
//! use listings::{fetch_jobs, HttpSession, SourceConfig};
//!
//! let config = SourceConfig::new()
//!     .with_keywords(["software", "engineer"])
//!     .with_max_age_days(7)
//!     .with_detail_fetch_budget(40);
//!
//! let session = HttpSession::connect().await?;
//! let outcome = fetch_jobs(&session, &config).await;
//! for job in &outcome.jobs {
//!     println!("{} — {}", job.title, job.link);
//! }
//! ```
//!
//! # Modules
//!
//! - [`dates`] - free-form date interpretation
//! - [`links`] - job-detail link validation and canonicalization
//! - [`extract`] - structured and markup listing strategies
//! - [`enrich`] - budgeted detail-page date enrichment
//! - [`freshness`] - cutoff filtering
//! - [`pipeline`] - orchestration
//! - [`fetch`] - the `Fetcher` seam and the real HTTP session
//! - [`testing`] - mock fetcher for tests

pub mod dates;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod freshness;
pub mod links;
pub mod pipeline;
pub mod testing;
pub mod types;

pub use dates::{parse_possible_date, DateMatch};
pub use enrich::{date_from_detail_page, enrich_posted_dates};
pub use error::{FetchError, FetchResult};
pub use extract::{jobs_from_html, jobs_from_json, markup_jobs, structured_jobs};
pub use fetch::{FetchedPage, Fetcher, HttpSession};
pub use freshness::{filter_fresh, filter_fresh_at};
pub use links::normalize_job_link;
pub use pipeline::{fetch_jobs, ListingSource, RunOutcome};
pub use testing::MockFetcher;
pub use types::{dedup_records, JobRecord, SourceConfig};
