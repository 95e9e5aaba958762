//! Error types for backend proxy calls
//!
//! Every variant is a provider failure: the gateway absorbs it, records it
//! against the provider's circuit breaker, and returns fallback data instead.

use thiserror::Error;

/// Errors that can occur when calling the backend proxy
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, DNS, or timeout failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON shape
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GatewayError {
    /// True when the request exceeded the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Transport(e) if e.is_timeout())
    }
}
