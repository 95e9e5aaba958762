//! HTTP client for the backend proxy
//!
//! Thin wrapper over `reqwest` that joins endpoint paths onto the configured
//! base URL, enforces a per-request timeout, and turns non-2xx statuses and
//! malformed bodies into [`GatewayError`]s.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;

/// Client for the backend proxy endpoints
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client whose requests fail after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("transitgate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates a client using an existing HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/api/weather/accra`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GETs `path` and parses the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.url(path);
        let response = self.http_client.get(&url).send().await?;
        Self::parse(response, url).await
    }

    /// POSTs `body` as JSON to `path` and parses the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::parse(response, url).await
    }

    /// GETs `path`, succeeding on any 2xx status and ignoring the body
    pub async fn probe(&self, path: &str) -> Result<(), GatewayError> {
        let url = self.url(path);
        let response = self.http_client.get(&url).send().await?;
        Self::check_status(&response, url)
    }

    fn check_status(response: &Response, url: String) -> Result<(), GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Status {
                status: status.as_u16(),
                url,
            })
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response, url: String) -> Result<T, GatewayError> {
        Self::check_status(&response, url)?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = BackendClient::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/weather/accra"),
            "http://localhost:8000/api/weather/accra"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = BackendClient::new("http://127.0.0.1:1", Duration::from_secs(2))
            .expect("Client should build");

        let result: Result<serde_json::Value, _> = client.get_json("/api/weather/accra").await;

        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
