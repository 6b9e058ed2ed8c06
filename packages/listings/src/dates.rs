//! Free-form date interpretation.
//!
//! Careers sites render posting dates in several shapes: ISO dates inside
//! structured payloads, long-form "January 5, 2025" labels, US slash dates,
//! and relative phrases like "3 days ago". [`parse_possible_date`] tries the
//! known formats in a strict priority order and reports the first match.
//! Pure text in, timestamp out; no I/O and no panics.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE_RE: Regex = Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap();
    static ref MONTH_NAME_DATE_RE: Regex = Regex::new(
        r"(?i)\b(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+(\d{1,2}),\s*(\d{4})\b"
    )
    .unwrap();
    static ref SLASH_DATE_RE: Regex = Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{4})\b").unwrap();
    static ref RELATIVE_RE: Regex =
        Regex::new(r"(?i)\b(\d+)\s+(hours?|days?|weeks?|months?)\s+ago\b").unwrap();
}

/// A successfully interpreted date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// The substring that matched, verbatim, for display
    pub matched: String,

    /// The normalized timestamp (UTC)
    pub timestamp: DateTime<Utc>,
}

/// Try to interpret a date anywhere inside `text`.
///
/// Strategies in priority order:
/// 1. ISO calendar date `YYYY-MM-DD`
/// 2. Month-name date `January 5, 2025` (3+-letter abbreviations accepted)
/// 3. Slash date `M/D/YYYY` (month/day/year)
/// 4. Relative phrase `N <hours|days|weeks|months> ago` (month = 30 days)
///
/// A strategy whose matched substring turns out to be an invalid calendar
/// value (e.g. day 32) is skipped and the next one gets a chance. Returns
/// `None` when nothing matches.
pub fn parse_possible_date(text: &str) -> Option<DateMatch> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_RE.captures(text) {
        let raw = caps.get(1)?.as_str();
        if let Some(timestamp) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(midnight_utc)
        {
            return Some(DateMatch {
                matched: raw.to_string(),
                timestamp,
            });
        }
    }

    if let Some(caps) = MONTH_NAME_DATE_RE.captures(text) {
        let parsed = month_index(caps.get(1)?.as_str())
            .zip(caps.get(2)?.as_str().parse::<u32>().ok())
            .zip(caps.get(3)?.as_str().parse::<i32>().ok())
            .and_then(|((month, day), year)| NaiveDate::from_ymd_opt(year, month, day))
            .and_then(midnight_utc);
        if let Some(timestamp) = parsed {
            return Some(DateMatch {
                matched: caps.get(0)?.as_str().to_string(),
                timestamp,
            });
        }
    }

    if let Some(caps) = SLASH_DATE_RE.captures(text) {
        let raw = caps.get(1)?.as_str();
        if let Some(timestamp) = NaiveDate::parse_from_str(raw, "%m/%d/%Y")
            .ok()
            .and_then(midnight_utc)
        {
            return Some(DateMatch {
                matched: raw.to_string(),
                timestamp,
            });
        }
    }

    if let Some(caps) = RELATIVE_RE.captures(text) {
        let count = caps.get(1)?.as_str().parse::<i64>().ok()?;
        let delta = relative_delta(caps.get(2)?.as_str(), count)?;
        let timestamp = Utc::now().checked_sub_signed(delta)?;
        return Some(DateMatch {
            matched: caps.get(0)?.as_str().to_string(),
            timestamp,
        });
    }

    None
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn month_index(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

fn relative_delta(unit: &str, count: i64) -> Option<Duration> {
    match unit.to_ascii_lowercase().as_str() {
        "hour" | "hours" => Duration::try_hours(count),
        "day" | "days" => Duration::try_days(count),
        "week" | "weeks" => Duration::try_weeks(count),
        // Approximated as exactly 30 days, matching what listing sites mean
        "month" | "months" => count.checked_mul(30).and_then(Duration::try_days),
        _ => None,
    }
}
