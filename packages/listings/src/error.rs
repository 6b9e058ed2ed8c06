//! Typed errors for the listings pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! a transport failure from a non-success response. Fetch failures never
//! escape the pipeline itself; each strategy degrades to its next fallback.

use thiserror::Error;

/// Errors produced while fetching pages from the target site.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure (connect, timeout, body read)
    #[error("request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
