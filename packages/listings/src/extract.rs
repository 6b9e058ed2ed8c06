//! Listing extraction strategies.
//!
//! Two sibling strategies produce the same record shape:
//!
//! - **Structured**: the site's `search.json` endpoint, probed with a fixed
//!   list of query variants; the first variant that yields any records wins.
//! - **Markup**: rendered listing pages, scanning every anchor and reading
//!   context (location, posted date) out of the enclosing block's text.
//!
//! Both filter titles through the configured keywords and deduplicate by
//! `(title, link)` before returning.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::dates::parse_possible_date;
use crate::fetch::Fetcher;
use crate::links::normalize_job_link;
use crate::types::{dedup_records, JobRecord, SourceConfig};

/// Structured listing endpoint.
pub const SEARCH_JSON_URL: &str = "https://www.amazon.jobs/en/search.json";

/// Rendered category landing page, the primary markup source.
pub const CATEGORY_PAGE_URL: &str =
    "https://www.amazon.jobs/en/job_categories/software-development";

/// Rendered search page, the secondary markup source.
pub const SEARCH_PAGE_URL: &str = "https://www.amazon.jobs/en/search";

/// Top-level keys that carry the job list, in priority order.
const LIST_KEYS: [&str; 5] = ["jobs", "search_results", "results", "hits", "items"];

/// Place and work-mode names recognized in listing block text.
const LOCATION_HINTS: [&str; 8] = [
    "United States",
    "India",
    "Canada",
    "Remote",
    "Hybrid",
    "Seattle",
    "Bangalore",
    "Hyderabad",
];

/// Query variants for the structured endpoint. The param spelling has
/// changed across site revisions, so several are probed.
fn search_json_variants() -> [Vec<(&'static str, &'static str)>; 3] {
    [
        vec![
            ("result_limit", "100"),
            ("offset", "0"),
            ("category[]", "Software Development"),
        ],
        vec![
            ("result_limit", "100"),
            ("offset", "0"),
            ("job_category[]", "Software Development"),
        ],
        vec![("result_limit", "100"), ("offset", "0"), ("query", "software")],
    ]
}

/// Structured-source strategy: probe the search.json variants, first
/// success wins. Fetch or decode failure of one variant falls through to
/// the next; exhausting all variants yields an empty list.
pub async fn structured_jobs(fetcher: &dyn Fetcher, config: &SourceConfig) -> Vec<JobRecord> {
    for params in search_json_variants() {
        let page = match fetcher.get(SEARCH_JSON_URL, &params).await {
            Ok(page) => page,
            Err(e) => {
                debug!(error = %e, "search.json variant failed");
                continue;
            }
        };
        let data = match page.json() {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "search.json body was not JSON");
                continue;
            }
        };
        let jobs = jobs_from_json(&data, config);
        if !jobs.is_empty() {
            debug!(count = jobs.len(), "structured variant yielded records");
            return jobs;
        }
    }
    Vec::new()
}

/// Extract job records from a structured payload of unknown shape.
pub fn jobs_from_json(data: &Value, config: &SourceConfig) -> Vec<JobRecord> {
    let mut records = Vec::new();

    for list in candidate_lists(data) {
        for item in list {
            let Some(title) = text_field(item, &["title", "job_title"]) else {
                continue;
            };
            let title = title.trim().to_string();
            if title.is_empty() || !config.title_matches(&title) {
                continue;
            }

            // Prefer the canonical detail path over apply deep-links
            let raw_link = text_field(item, &["job_path", "absolute_url"])
                .or_else(|| text_field(item, &["apply_url", "url_next_step"]));
            let Some(link) = raw_link.as_deref().and_then(normalize_job_link) else {
                continue;
            };

            let location = text_field(item, &["location", "normalized_location", "city"])
                .unwrap_or_default();
            let posted_text =
                text_field(item, &["posted_date", "posting_date", "posted_at"]).unwrap_or_default();
            let posted_at = parse_possible_date(&posted_text).map(|m| m.timestamp);

            records.push(JobRecord {
                title,
                link,
                location,
                posted_text,
                posted_at,
            });
        }
    }

    dedup_records(records)
}

/// Markup-source strategy: fetch the known listing pages and union the
/// records extracted from each, deduplicating across all of them.
pub async fn markup_jobs(fetcher: &dyn Fetcher, config: &SourceConfig) -> Vec<JobRecord> {
    let mut records = Vec::new();

    match fetcher.get(CATEGORY_PAGE_URL, &[]).await {
        Ok(page) => records.extend(jobs_from_html(&page.body, config)),
        Err(e) => warn!(error = %e, "category page fetch failed"),
    }

    for params in [("category", "Software Development"), ("query", "software")] {
        match fetcher.get(SEARCH_PAGE_URL, &[params]).await {
            Ok(page) => records.extend(jobs_from_html(&page.body, config)),
            Err(e) => warn!(error = %e, "search page fetch failed"),
        }
    }

    dedup_records(records)
}

/// Extract job records from rendered listing markup.
///
/// Every anchor is a candidate: its href must normalize to a job-detail
/// URL and its visible text (the title) must pass the keyword filter.
/// Location and posted date are scavenged from the enclosing block's text.
pub fn jobs_from_html(html: &str, config: &SourceConfig) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();

    let mut records = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = normalize_job_link(href) else {
            continue;
        };

        let title = collapse_whitespace(anchor.text());
        if title.is_empty() || !config.title_matches(&title) {
            continue;
        }

        let block_text = anchor
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| collapse_whitespace(parent.text()))
            .unwrap_or_else(|| title.clone());

        let location = LOCATION_HINTS
            .iter()
            .find(|hint| block_text.contains(*hint))
            .map(|hint| hint.to_string())
            .unwrap_or_default();

        let (posted_text, posted_at) = match parse_possible_date(&block_text) {
            Some(m) => (m.matched, Some(m.timestamp)),
            None => (String::new(), None),
        };

        records.push(JobRecord {
            title,
            link,
            location,
            posted_text,
            posted_at,
        });
    }

    dedup_records(records)
}

/// Collapse runs of whitespace into single spaces, trimming the ends.
pub(crate) fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the lists that may carry job items: known keys first, otherwise
/// any top-level array whose first element is a keyed record.
fn candidate_lists(data: &Value) -> Vec<&Vec<Value>> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };

    let mut lists: Vec<&Vec<Value>> = LIST_KEYS
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_array))
        .collect();

    if lists.is_empty() {
        for value in map.values() {
            if let Some(array) = value.as_array() {
                if array.first().map(Value::is_object).unwrap_or(false) {
                    lists.push(array);
                }
            }
        }
    }

    lists
}

/// First non-empty aliased field, as text. Strings come through verbatim;
/// bare numbers (some feeds ship epoch-ish values) are stringified.
fn text_field(item: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| match item.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
