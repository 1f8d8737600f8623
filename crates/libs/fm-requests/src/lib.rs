//! HTTP client library for making JSON API requests.
//!
//! A thin wrapper around reqwest that joins endpoints onto a base URL,
//! bounds every request with a timeout and turns transport, status and
//! decode failures into typed errors that name the URL involved.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fm_requests::ApiClient;
//! use std::time::Duration;
//!
//! # async fn example() -> fm_requests::prelude::Result<()> {
//! let client = ApiClient::new("https://ci.example.org/api/v2", Duration::from_secs(30))?;
//! let data: serde_json::Value = client.get("builders").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod prelude;

use std::{borrow::Borrow, time::Duration};

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::prelude::*;

/// HTTP client for making API requests with JSON support.
#[derive(Debug, Clone)]
pub struct ApiClient {
    url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a new API client with the given base URL.
    ///
    /// Trailing slashes on the base URL are ignored. Every request issued by
    /// this client fails once `timeout` elapses.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into().trim_end_matches('/').to_string();
        Ok(Self {
            url,
            client: build_client(timeout)?,
        })
    }

    /// The base URL requests are joined onto.
    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// Constructs the full URL path for an endpoint.
    fn path(&self, endpoint: &str) -> String {
        format!("{}/{}", self.url, endpoint.trim_start_matches('/'))
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let path = self.path(endpoint);
        let url = Url::parse(&path).map_err(|err| Error::InvalidUrl {
            url: path.clone(),
            reason: err.to_string(),
        })?;
        let body = get_text(&self.client, url.clone()).await?;
        decode(&url, &body)
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_params<T, I, K, V>(&self, endpoint: &str, params: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = self.path(endpoint);
        let url = Url::parse_with_params(&path, params).map_err(|err| Error::InvalidUrl {
            url: path.clone(),
            reason: err.to_string(),
        })?;
        let body = get_text(&self.client, url.clone()).await?;
        decode(&url, &body)
    }
}

/// Fetches the body of an absolute URL as text.
///
/// Used for documents that are not JSON, such as remotely hosted
/// configuration files.
pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let parsed = Url::parse(url).map_err(|err| Error::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    let client = build_client(timeout)?;
    get_text(&client, parsed).await
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::ClientBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("failman/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::Client)
}

async fn get_text(client: &reqwest::Client, url: Url) -> Result<String> {
    debug!("GET {url}");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| Error::Request {
        url: url.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: String,
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/api/echo",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let value = params.get("value").cloned().unwrap_or_default();
                    Json(serde_json::json!({ "value": value }))
                }),
            )
            .route("/api/broken", get(|| async { "not json" }))
            .route(
                "/api/missing",
                get(|| async { (StatusCode::NOT_FOUND, "gone") }),
            )
            .route("/config.toml", get(|| async { "key = 1\n" }))
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = ApiClient::new("http://ci.example.org/api/v2/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://ci.example.org/api/v2");
        assert_eq!(client.path("/builders"), "http://ci.example.org/api/v2/builders");
        assert_eq!(client.path("changes"), "http://ci.example.org/api/v2/changes");
    }

    #[tokio::test]
    async fn get_with_params_decodes_json() {
        let base = serve(router()).await;
        let client = ApiClient::new(format!("{base}/api"), Duration::from_secs(5)).unwrap();

        let echo: Echo = client
            .get_with_params("echo", [("value", "feature/x y")])
            .await
            .unwrap();
        assert_eq!(echo.value, "feature/x y");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = serve(router()).await;
        let client = ApiClient::new(format!("{base}/api"), Duration::from_secs(5)).unwrap();

        let err = client.get::<Echo>("missing").await.unwrap_err();
        match &err {
            Error::Status { status, url } => {
                assert_eq!(*status, StatusCode::NOT_FOUND);
                assert!(url.ends_with("/api/missing"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.url().is_some());
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let base = serve(router()).await;
        let client = ApiClient::new(format!("{base}/api"), Duration::from_secs(5)).unwrap();

        let err = client.get::<Echo>("broken").await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let err = client.get::<Echo>("anything").await.unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
    }

    #[tokio::test]
    async fn fetch_text_returns_raw_body() {
        let base = serve(router()).await;
        let body = fetch_text(&format!("{base}/config.toml"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, "key = 1\n");
    }

    #[tokio::test]
    async fn fetch_text_rejects_relative_urls() {
        let err = fetch_text("config.toml", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
