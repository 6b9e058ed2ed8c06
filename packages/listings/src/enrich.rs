//! Detail-page date enrichment.
//!
//! Listing views often omit posting dates. For records still missing one,
//! the enricher fetches the job's own page and digs for a date in three
//! places, cheapest-to-parse first: JSON-LD structured data, OpenGraph-style
//! meta tags, then a visible "Updated"/"Posted" label. Fetches are bounded
//! by a per-run budget and every failure is swallowed; a record that stays
//! dateless simply falls to the freshness filter later.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use crate::dates::parse_possible_date;
use crate::extract::collapse_whitespace;
use crate::fetch::Fetcher;
use crate::types::JobRecord;

/// JSON-LD keys that carry a posting date, in priority order.
const JSON_LD_DATE_KEYS: [&str; 3] = ["datePosted", "dateModified", "datePublished"];

/// Meta-tag properties that carry a timestamp, in priority order.
const META_DATE_PROPERTIES: [&str; 3] = [
    "article:published_time",
    "article:modified_time",
    "og:updated_time",
];

lazy_static! {
    static ref LABEL_DATE_RE: Regex = Regex::new(
        r"(?i)\b(Updated|Posted)\s*:?\s*(?P<date>(?:\d{4}-\d{2}-\d{2})|(?:\d{1,2}/\d{1,2}/\d{4})|(?:[A-Za-z]{3,9}\s+\d{1,2},\s*\d{4}))"
    )
    .unwrap();
}

/// Fetch detail pages for records lacking a date, up to `budget` attempts.
///
/// The budget counts attempts, not successes: a fetch that fails still
/// spends one. Records that already carry a date are skipped for free.
/// Returns the number of attempts actually spent.
pub async fn enrich_posted_dates(
    records: &mut [JobRecord],
    fetcher: &dyn Fetcher,
    budget: usize,
) -> usize {
    let mut attempts = 0;

    for record in records.iter_mut() {
        if record.posted_at.is_some() {
            continue;
        }
        if attempts >= budget {
            break;
        }
        attempts += 1;

        let page = match fetcher.get(&record.link, &[]).await {
            Ok(page) => page,
            Err(e) => {
                debug!(url = %record.link, error = %e, "detail fetch failed");
                continue;
            }
        };

        if let Some((display_text, timestamp)) = date_from_detail_page(&page.body) {
            debug!(url = %record.link, date = %display_text, "detail page yielded a date");
            record.posted_text = display_text;
            record.posted_at = Some(timestamp);
        }
    }

    attempts
}

/// Scan one detail page for a posting date. First strategy to succeed wins.
pub fn date_from_detail_page(html: &str) -> Option<(String, DateTime<Utc>)> {
    let document = Html::parse_document(html);
    date_from_json_ld(&document)
        .or_else(|| date_from_meta_tags(&document))
        .or_else(|| date_from_visible_label(&document))
}

fn date_from_json_ld(document: &Html) -> Option<(String, DateTime<Utc>)> {
    let scripts = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    for script in document.select(&scripts) {
        let raw = script.text().collect::<String>();
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(_) => continue,
        };

        let objects: Vec<&Value> = match &data {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for object in objects {
            let Some(map) = object.as_object() else {
                continue;
            };
            for key in JSON_LD_DATE_KEYS {
                let Some(value) = map.get(key) else {
                    continue;
                };
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if let Some(m) = parse_possible_date(&text) {
                    return Some((m.matched, m.timestamp));
                }
            }
        }
    }

    None
}

fn date_from_meta_tags(document: &Html) -> Option<(String, DateTime<Utc>)> {
    for property in META_DATE_PROPERTIES {
        let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).unwrap();
        if let Some(tag) = document.select(&selector).next() {
            if let Some(content) = tag.value().attr("content") {
                if let Some(m) = parse_possible_date(content) {
                    return Some((m.matched, m.timestamp));
                }
            }
        }
    }
    None
}

fn date_from_visible_label(document: &Html) -> Option<(String, DateTime<Utc>)> {
    let text = collapse_whitespace(document.root_element().text());
    let caps = LABEL_DATE_RE.captures(&text)?;

    let raw_date = caps.name("date")?.as_str();
    let m = parse_possible_date(raw_date)?;

    let mut label = caps.get(1)?.as_str().to_lowercase();
    label[..1].make_ascii_uppercase();

    Some((format!("{label}: {raw_date}"), m.timestamp))
}
