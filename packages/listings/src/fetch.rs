//! Page fetching for the pipeline.
//!
//! [`Fetcher`] is the seam between the pipeline and the network: the real
//! implementation is [`HttpSession`], a reqwest client with browser-like
//! headers and a cookie jar warmed against the site's landing page. Tests
//! plug in [`crate::testing::MockFetcher`] instead.

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER,
};
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::links::SITE_BASE;

/// Per-request timeout. No retries; a failed fetch is abandoned.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0 Safari/537.36";

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// Response body text
    pub body: String,
}

impl FetchedPage {
    /// Best-effort JSON decoding of the body.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Pluggable page fetching.
///
/// Implementations return `Ok` only for successful (2xx) responses; a
/// non-success status is a [`FetchError::Status`] so every caller treats it
/// the same way as a transport failure: skip and move on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a URL with optional query parameters.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<FetchedPage>;
}

/// HTTP session against the target site.
///
/// Holds the shared cookie jar for one pipeline run. Requests carry a
/// realistic browser user-agent, accept headers, and a Referer pointing at
/// the site base, since the listing endpoints answer differently to clients
/// that look like bots.
pub struct HttpSession {
    client: reqwest::Client,
}

impl HttpSession {
    /// Build the client and warm the cookie jar with a landing-page request.
    ///
    /// Warm-up failure is not fatal; the run proceeds with a cold jar.
    pub async fn connect() -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static(SITE_BASE));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        let session = Self { client };
        if let Err(e) = session.get(SITE_BASE, &[]).await {
            debug!(error = %e, "landing page warm-up failed, continuing with cold session");
        }
        Ok(session)
    }
}

#[async_trait]
impl Fetcher for HttpSession {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<FetchedPage> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}
