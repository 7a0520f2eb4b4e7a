//! HTTP client for fetching the listing page
//!
//! Fetches raw HTML with a configured user agent and timeout, retrying
//! failed attempts with a linear backoff. Parsing into a DOM is left to the
//! caller because `scraper::Html` cannot cross an await point.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::infrastructure::config::HttpConfig;

/// Supplies the rendered HTML of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_delay: Duration,
    /// User agent string
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the `http` config section
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http.timeout_seconds,
            max_retries: http.max_retries,
            retry_delay: Duration::from_millis(http.retry_delay_ms),
            user_agent: http.user_agent.clone(),
        }
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// reqwest-backed page fetcher
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {} from {}", status, url));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read body of {}: {}", url, e))
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            debug!("Fetching {} (attempt {})", url, attempt + 1);
            match self.fetch_once(url).await {
                Ok(body) => {
                    info!("Fetched {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff(attempt);
                    warn!("{} - retrying in {:?} ({}/{})", e, delay, attempt, self.config.max_retries);
                    sleep(delay).await;
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "Giving up on {} after {} attempts",
                        url,
                        attempt + 1
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_config_from_section() {
        let http = HttpConfig {
            timeout_seconds: 5,
            max_retries: 2,
            retry_delay_ms: 250,
            user_agent: "test-agent".to_string(),
        };
        let config = HttpClientConfig::from_http_config(&http);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_backoff_grows_linearly() {
        let config = HttpClientConfig {
            retry_delay: Duration::from_millis(100),
            ..HttpClientConfig::default()
        };
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(3), Duration::from_millis(300));
    }
}
