//! Article retrieval over HTTP.
//!
//! [`Fetch`] is the seam the pipeline depends on, so tests can swap in a fake
//! transport. [`HttpFetcher`] performs exactly one request per call; retries
//! are layered on top with [`crate::retry::Retrying`].

use crate::config::FetchConfig;
use crate::error::FetchError;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Retrieve the raw document behind a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Single-attempt fetcher backed by a shared `reqwest` client.
///
/// The client carries the fixed identification header and request timeout,
/// so every call uses the same transport settings.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, config.timeout())
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched document");
        Ok(body)
    }
}
