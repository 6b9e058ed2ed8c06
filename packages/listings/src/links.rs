//! Job-detail link validation and canonicalization.
//!
//! Listing pages are full of links that are not job postings (nav, account,
//! footer). A candidate href only survives if it points at a job detail page
//! on the target site, and relative paths are resolved to absolute URLs.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Site root used to resolve relative job paths.
pub const SITE_ROOT: &str = "https://www.amazon.jobs";

/// English landing page; also used as the Referer and for session warm-up.
pub const SITE_BASE: &str = "https://www.amazon.jobs/en/";

lazy_static! {
    static ref JOB_PATH_RE: Regex = Regex::new(r"^(/en)?/jobs/").unwrap();
}

/// Canonicalize a candidate href into an absolute job-detail URL.
///
/// Accepts:
/// - absolute URLs whose host is the job domain and whose path contains the
///   `/jobs/` segment (account/login pages on sibling hosts are rejected)
/// - root-relative paths matching `/jobs/...` or `/en/jobs/...`, resolved
///   against the site root
///
/// Everything else, including empty input, yields `None`.
pub fn normalize_job_link(raw: &str) -> Option<String> {
    let link = raw.trim();
    if link.is_empty() {
        return None;
    }

    if link.starts_with("http://") || link.starts_with("https://") {
        let url = Url::parse(link).ok()?;
        let host = url.host_str()?;
        if is_job_host(host) && url.path().contains("/jobs/") {
            return Some(link.to_string());
        }
        return None;
    }

    if JOB_PATH_RE.is_match(link) {
        let root = Url::parse(SITE_ROOT).ok()?;
        return root.join(link).ok().map(String::from);
    }

    None
}

fn is_job_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("amazon.jobs") || host.eq_ignore_ascii_case("www.amazon.jobs")
}
