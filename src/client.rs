//! Client for the compatibility query service.
//!
//! One `GET {base_url}/api/parts/{stage_key}` per stage, parameterized by the
//! ids the stage depends on. The service answers with a JSON array of part
//! records; anything else is a [`FetchError`].

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::configurator::StageQuery;
use crate::errors::FetchError;
use crate::part::Part;

/// Source of candidate parts for a stage query.
/// Real implementation: `HttpCompatibilityClient`. Tests use in-memory doubles.
#[async_trait]
pub trait CompatibilitySource: Send + Sync {
    async fn fetch(&self, query: &StageQuery) -> Result<Vec<Part>, FetchError>;
}

/// Error body the service sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed client, built once and shared for the whole session.
#[derive(Debug, Clone)]
pub struct HttpCompatibilityClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCompatibilityClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("buildmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a query, without parameters.
    pub fn url_for(&self, query: &StageQuery) -> String {
        format!("{}{}", self.base_url, query.path())
    }
}

#[async_trait]
impl CompatibilitySource for HttpCompatibilityClient {
    async fn fetch(&self, query: &StageQuery) -> Result<Vec<Part>, FetchError> {
        let url = self.url_for(query);
        debug!(url = %url, params = ?query.params, "fetching candidates");

        let resp = self
            .http
            .get(&url)
            .query(&query.params)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let parts: Vec<Part> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!(url = %url, count = parts.len(), "candidates fetched");
        Ok(parts)
    }
}

/// Prefer the service's `{"error": ...}` message, then the raw body, then
/// the status reason.
fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.error;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
