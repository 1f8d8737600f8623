//! HTTP client error types.

use reqwest::StatusCode;

/// HTTP client errors.
///
/// Every variant that comes from a request carries the URL it was issued
/// against so callers can report which endpoint failed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The underlying client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The endpoint could not be turned into a valid URL.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure (connect, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The body was not the JSON we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// URL of the failed request, if the error came from one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Client(_) => None,
            Error::InvalidUrl { url, .. }
            | Error::Request { url, .. }
            | Error::Status { url, .. }
            | Error::Decode { url, .. } => Some(url),
        }
    }
}
