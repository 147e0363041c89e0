//! Shared HTTP plumbing for the venue REST clients.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::warn;

use crate::error::Result;

/// HTTP client settings shared by all venue adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Fixed backoff between attempts in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    5000
}

const fn default_http_connect_timeout_ms() -> u64 {
    2000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

/// GET-with-retry JSON client.
///
/// Retries only on timeouts and connect errors. HTTP 404 maps to
/// `Ok(None)`; any other error status is returned as-is.
#[derive(Debug, Clone)]
pub struct RetryingHttp {
    http: HttpClient,
    max_attempts: u32,
    backoff: Duration,
}

impl RetryingHttp {
    #[must_use]
    pub fn from_config(config: &HttpConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            max_attempts: config.retry_max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    pub async fn get_json<T>(&self, url: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = match self.http.get(url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= self.max_attempts || !should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, &err).await;
                    continue;
                }
            };

            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let response = response.error_for_status()?;

            match response.json::<T>().await {
                Ok(parsed) => return Ok(Some(parsed)),
                Err(err) => {
                    if attempt >= self.max_attempts || !should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, &err).await;
                }
            }
        }
    }

    async fn backoff(&self, attempt: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts = self.max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if !self.backoff.is_zero() {
            sleep(self.backoff).await;
        }
    }
}

fn should_retry(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}
