//! Search query execution
//!
//! One request per call, no retries. Outcomes are classified so the
//! caller can decide whether to try again.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::TorSession;
use tordork_core::Engine;

/// Why a single search attempt produced no body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("429 Too Many Requests")]
    RateLimited,

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Transport(format!("timed out: {}", err))
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Performs exactly one search request
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Fetch a fully built search URL
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Search `engine` for `query`
    async fn search(&self, engine: Engine, query: &str) -> Result<String, FetchError> {
        self.fetch(&engine.build_url(query)).await
    }
}

#[async_trait]
impl QueryExecutor for TorSession {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("429 Too Many Requests: {}", url);
            return Err(FetchError::RateLimited);
        }

        if !status.is_success() {
            warn!("Request to {} returned status: {}", url, status);
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Response received");
        Ok(body)
    }
}
