//! End-to-end pipeline tests against canned listing fixtures.

use chrono::{Duration, Utc};

use listings::extract::{CATEGORY_PAGE_URL, SEARCH_JSON_URL, SEARCH_PAGE_URL};
use listings::{fetch_jobs, ListingSource, MockFetcher, SourceConfig};

fn iso(days_ago: i64) -> String {
    (Utc::now() - Duration::days(days_ago))
        .format("%Y-%m-%d")
        .to_string()
}

/// Listing fixture: two fresh matches, one stale match, one non-match.
fn listing_fixture() -> String {
    format!(
        r#"
        <html><body>
          <div class="tile">
            <a href="/en/jobs/100/software-engineer-ii">Software Engineer II</a>
            <span>Seattle</span><span>Posted 2 days ago</span>
          </div>
          <div class="tile">
            <a href="/en/jobs/101/support-engineer">Support Engineer</a>
            <span>Remote</span><span>Updated {fresh}</span>
          </div>
          <div class="tile">
            <a href="/en/jobs/102/systems-engineer">Systems Engineer</a>
            <span>India</span><span>Posted 30 days ago</span>
          </div>
          <div class="tile">
            <a href="/en/jobs/103/area-manager">Area Manager</a>
            <span>Canada</span><span>Posted 1 day ago</span>
          </div>
          <a href="https://account.amazon.com/profile">Your account</a>
        </body></html>
        "#,
        fresh = iso(3)
    )
}

#[tokio::test]
async fn markup_fallback_returns_only_fresh_matches() {
    let fetcher = MockFetcher::new()
        .with_failure(SEARCH_JSON_URL, 403)
        .with_page(CATEGORY_PAGE_URL, listing_fixture())
        .with_failure(SEARCH_PAGE_URL, 404);

    let config = SourceConfig::new()
        .with_keywords(["engineer"])
        .with_max_age_days(7)
        .with_detail_fetch_budget(0);

    let outcome = fetch_jobs(&fetcher, &config).await;

    assert_eq!(outcome.source, ListingSource::Markup);
    // Stale and non-matching postings discovered but filtered out later
    assert_eq!(outcome.discovered, 3);

    let titles: Vec<&str> = outcome.jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Software Engineer II", "Support Engineer"]);
    assert!(outcome.jobs.iter().all(|j| j.posted_at.is_some()));
    assert_eq!(
        outcome.jobs[0].link,
        "https://www.amazon.jobs/en/jobs/100/software-engineer-ii"
    );
}

#[tokio::test]
async fn structured_source_wins_and_enrichment_fills_missing_dates() {
    let detail_url = "https://www.amazon.jobs/en/jobs/201/data-engineer";
    let payload = format!(
        r#"{{
            "jobs": [
                {{"title": "Software Engineer", "job_path": "/en/jobs/200/sde", "location": "Seattle", "posted_date": "{}"}},
                {{"title": "Data Engineer", "job_path": "/en/jobs/201/data-engineer", "location": "Remote"}}
            ]
        }}"#,
        iso(1)
    );
    let detail_page = format!(
        r#"<html><head><script type="application/ld+json">{{"@type": "JobPosting", "datePosted": "{}"}}</script></head></html>"#,
        iso(2)
    );

    let fetcher = MockFetcher::new()
        .with_page(SEARCH_JSON_URL, payload)
        .with_page(detail_url, detail_page);

    let config = SourceConfig::new()
        .with_keywords(["engineer"])
        .with_max_age_days(7)
        .with_detail_fetch_budget(10);

    let outcome = fetch_jobs(&fetcher, &config).await;

    assert_eq!(outcome.source, ListingSource::Structured);
    assert_eq!(outcome.jobs.len(), 2);
    assert_eq!(outcome.detail_fetches, 1);
    assert!(outcome.jobs.iter().all(|j| j.posted_at.is_some()));

    // One structured probe, one detail fetch, nothing else
    let calls = fetcher.calls();
    assert_eq!(calls, vec![SEARCH_JSON_URL.to_string(), detail_url.to_string()]);
}

#[tokio::test]
async fn enrichment_budget_bounds_detail_fetches() {
    let payload = r#"{
        "jobs": [
            {"title": "Engineer A", "job_path": "/en/jobs/1/a"},
            {"title": "Engineer B", "job_path": "/en/jobs/2/b"},
            {"title": "Engineer C", "job_path": "/en/jobs/3/c"}
        ]
    }"#;

    let fetcher = MockFetcher::new().with_page(SEARCH_JSON_URL, payload);

    let config = SourceConfig::new()
        .with_keywords(["engineer"])
        .with_max_age_days(7)
        .with_detail_fetch_budget(2);

    let outcome = fetch_jobs(&fetcher, &config).await;

    // All three detail pages 404; only two attempts allowed
    assert_eq!(outcome.detail_fetches, 2);
    assert_eq!(fetcher.calls().len(), 3);
    // No dates recovered anywhere, so nothing survives the freshness filter
    assert!(outcome.jobs.is_empty());
    assert_eq!(outcome.discovered, 3);
}

#[tokio::test]
async fn max_results_caps_the_final_list() {
    let payload = format!(
        r#"{{
            "jobs": [
                {{"title": "Engineer A", "job_path": "/en/jobs/1/a", "posted_date": "{d}"}},
                {{"title": "Engineer B", "job_path": "/en/jobs/2/b", "posted_date": "{d}"}},
                {{"title": "Engineer C", "job_path": "/en/jobs/3/c", "posted_date": "{d}"}}
            ]
        }}"#,
        d = iso(1)
    );

    let fetcher = MockFetcher::new().with_page(SEARCH_JSON_URL, payload);

    let config = SourceConfig::new()
        .with_keywords(["engineer"])
        .with_max_results(2);

    let outcome = fetch_jobs(&fetcher, &config).await;
    assert_eq!(outcome.jobs.len(), 2);
}

#[tokio::test]
async fn everything_failing_yields_an_empty_run() {
    let fetcher = MockFetcher::new();

    let config = SourceConfig::new().with_keywords(["engineer"]);
    let outcome = fetch_jobs(&fetcher, &config).await;

    assert_eq!(outcome.source, ListingSource::Empty);
    assert!(outcome.jobs.is_empty());
    assert_eq!(outcome.detail_fetches, 0);
}
