//! Freshness cutoff filtering.

use chrono::{DateTime, Duration, Utc};

use crate::dates::parse_possible_date;
use crate::types::JobRecord;

/// Drop records older than `max_age_days`, measured from the current time.
pub fn filter_fresh(records: Vec<JobRecord>, max_age_days: i64) -> Vec<JobRecord> {
    filter_fresh_at(records, max_age_days, Utc::now())
}

/// Drop records older than `max_age_days`, measured from `now`.
///
/// A record is kept iff it has a resolvable timestamp at or after the
/// cutoff. When `posted_at` is absent the raw posted text gets one more
/// pass through the date interpreter; a resolved timestamp is written back
/// so every record this function returns carries `posted_at`. Records with
/// no resolvable date at all are dropped.
pub fn filter_fresh_at(
    records: Vec<JobRecord>,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Vec<JobRecord> {
    let Some(age) = Duration::try_days(max_age_days) else {
        return Vec::new();
    };
    let cutoff = now - age;

    records
        .into_iter()
        .filter_map(|mut record| {
            let resolved = record
                .posted_at
                .or_else(|| parse_possible_date(&record.posted_text).map(|m| m.timestamp))?;
            if resolved >= cutoff {
                record.posted_at = Some(resolved);
                Some(record)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(posted_at: DateTime<Utc>) -> JobRecord {
        JobRecord::new("Software Engineer", "https://www.amazon.jobs/en/jobs/1/sde")
            .with_posted_at(posted_at)
    }

    #[test]
    fn test_exactly_at_cutoff_is_kept() {
        let now = Utc::now();
        let records = vec![record_at(now - Duration::days(7))];

        assert_eq!(filter_fresh_at(records, 7, now).len(), 1);
    }

    #[test]
    fn test_one_second_past_cutoff_is_dropped() {
        let now = Utc::now();
        let records = vec![record_at(now - Duration::days(7) - Duration::seconds(1))];

        assert!(filter_fresh_at(records, 7, now).is_empty());
    }

    #[test]
    fn test_unknown_date_is_dropped() {
        let records = vec![JobRecord::new(
            "Software Engineer",
            "https://www.amazon.jobs/en/jobs/1/sde",
        )];

        assert!(filter_fresh_at(records, 7, Utc::now()).is_empty());
    }

    #[test]
    fn test_posted_text_reparse_resolves_and_is_written_back() {
        let now = Utc::now();
        let fresh = now - Duration::days(2);
        let record = JobRecord::new("SDE", "https://www.amazon.jobs/en/jobs/1/sde")
            .with_posted_text(fresh.format("%Y-%m-%d").to_string());

        let kept = filter_fresh_at(vec![record], 7, now);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].posted_at.is_some());
    }

    #[test]
    fn test_unparseable_posted_text_is_dropped() {
        let record = JobRecord::new("SDE", "https://www.amazon.jobs/en/jobs/1/sde")
            .with_posted_text("coming soon");

        assert!(filter_fresh_at(vec![record], 7, Utc::now()).is_empty());
    }
}
