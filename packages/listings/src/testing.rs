//! Testing utilities.
//!
//! [`MockFetcher`] lets pipeline tests run against canned page bodies
//! without touching the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::fetch::{FetchedPage, Fetcher};

/// A fetcher backed by canned responses.
///
/// Responses are keyed by URL only; query strings are ignored, so every
/// variant of a probe URL sees the same body. Every call is recorded for
/// assertions about fetch budgets and strategy order. URLs with no canned
/// response answer 404.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    failures: HashMap<String, u16>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock; every fetch answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Answer `url` with an HTTP error status.
    pub fn with_failure(mut self, url: impl Into<String>, status: u16) -> Self {
        self.failures.insert(url.into(), status);
        self
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, url: &str, _query: &[(&str, &str)]) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        if let Some(status) = self.failures.get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        match self.pages.get(url) {
            Some(body) => Ok(FetchedPage {
                url: url.to_string(),
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
