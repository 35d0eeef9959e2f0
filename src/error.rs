//! Error types for every stage of the pipeline.
//!
//! Per-URL errors ([`FetchError`]) are swallowed by the orchestrator and only
//! shrink the output set. [`SynthesisError`] is the one failure that can end a
//! run, surfaced to callers as [`PipelineError`].

use thiserror::Error;

/// HTTP status codes treated as transient server-side conditions.
pub const TRANSIENT_STATUSES: [u16; 3] = [502, 503, 504];

/// Failure to retrieve a source document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// DNS, connect, reset, or body read failure.
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Whether a retry of the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Network(_) => true,
            FetchError::HttpStatus(code) => TRANSIENT_STATUSES.contains(code),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Failure while translating the report or rendering it as speech.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("translation failed: {0}")]
    Translation(String),

    #[error("speech service failed: {0}")]
    TtsService(String),

    #[error("could not write audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML in config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The single failure surfaced by a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}
