//! HTTP fetcher for host comparison
//!
//! Issues one GET per (host, endpoint) pair and classifies the outcome.

use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Status code treated as success. Anything else is an API error.
const STATUS_OK: u16 = 200;

/// Fetch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection-level failure: DNS, refused connection, broken body stream
    #[error("failed to send request to [{url}]: {message}")]
    Transport { url: String, message: String },

    /// No response within the configured timeout
    #[error("request to [{url}] timed out after {secs} seconds")]
    Timeout { url: String, secs: u64 },

    /// The host answered with a status other than 200
    #[error("API error: {body}")]
    Status { url: String, status: u16, body: String },
}

impl FetchError {
    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Status { url, .. } => url,
        }
    }

    /// Status code, if the host answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures where no HTTP response was received
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Status { .. })
    }
}

/// Successful response from one host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostResponse {
    pub host: String,
    pub url: String,
    pub status_code: u16,
    pub body: String,
    pub duration_ms: u64,
}

/// Something that can fetch an endpoint from a host
pub trait Fetcher {
    fn fetch(
        &self,
        host: &str,
        endpoint: &str,
    ) -> impl Future<Output = Result<HostResponse, FetchError>> + Send;
}

/// Build the request URL by plain concatenation
pub fn request_url(host: &str, endpoint: &str) -> String {
    format!("{host}{endpoint}")
}

/// reqwest-backed fetcher
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_secs: Option<u64>,
}

impl HttpFetcher {
    /// Create a fetcher with an optional per-request timeout
    pub fn with_timeout(timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        match self.timeout_secs {
            Some(secs) if err.is_timeout() => FetchError::Timeout {
                url: url.to_string(),
                secs,
            },
            _ => FetchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, host: &str, endpoint: &str) -> Result<HostResponse, FetchError> {
        let url = request_url(host, endpoint);
        debug!("Sending GET request to {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(&url, e))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!("Response: {} from {} in {}ms", status, url, duration_ms);

        if status != STATUS_OK {
            return Err(FetchError::Status { url, status, body });
        }

        Ok(HostResponse {
            host: host.to_string(),
            url,
            status_code: status,
            body,
            duration_ms,
        })
    }
}
