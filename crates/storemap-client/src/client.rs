//! HTTP client for the store-locator REST API.
//!
//! Wraps `reqwest` with uniform status handling and typed response
//! deserialization. Every JSON body is checked for an application-level
//! failure (`"error"` field or `"success": false`) which surfaces as
//! [`ClientError::Api`]. Reads are retried on transient failures; writes are
//! sent exactly once.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storemap_core::AppConfig;

use crate::error::ClientError;
use crate::retry::retry_fixed;

/// Bounded, fixed-delay retry applied to idempotent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `1` disables retrying.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1_000),
        }
    }
}

/// Client for the store-locator API.
///
/// Use [`StoreMapClient::new`] with the loaded [`AppConfig`] or
/// [`StoreMapClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct StoreMapClient {
    client: Client,
    api_root: Url,
    retry: RetryPolicy,
}

impl StoreMapClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `api_url` is not a valid origin.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let retry = RetryPolicy {
            max_attempts: config.max_attempts,
            delay: config.retry_delay(),
        };
        Self::build(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
            retry,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, "storemap/0.1 (store-locator)", retry)
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("api/")` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let api_root = Url::parse(&normalised)
            .and_then(|u| u.join("api/"))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_root,
            retry: RetryPolicy {
                max_attempts: retry.max_attempts.max(1),
                ..retry
            },
        })
    }

    /// Builds `<origin>/api/<resource>` with percent-encoded query pairs.
    pub(crate) fn endpoint(&self, resource: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self
            .api_root
            .join(resource)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.api_root.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// GET with bounded retry, application-error check, and typed decoding.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let body = retry_fixed(self.retry.max_attempts, self.retry.delay, || {
            self.request_json::<()>(Method::GET, url.clone(), None)
        })
        .await?;
        Self::check_api_error(&body)?;
        Self::decode(body, &url)
    }

    /// Non-idempotent request: sent once, never retried.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        payload: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.request_json(method, url.clone(), payload).await?;
        Self::check_api_error(&body)?;
        Self::decode(body, &url)
    }

    /// Sends one request, asserts a 2xx status, and parses the body as JSON.
    async fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        payload: Option<&B>,
    ) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(%method, %url, "api request");
        let mut request = self.client.request(method, url.clone());
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    fn decode<T: DeserializeOwned>(body: serde_json::Value, url: &Url) -> Result<T, ClientError> {
        serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Detects an application-level failure on an otherwise successful response.
    pub(crate) fn check_api_error(body: &serde_json::Value) -> Result<(), ClientError> {
        if let Some(err) = body.get("error") {
            let msg = err
                .as_str()
                .map_or_else(|| err.to_string(), str::to_string);
            return Err(ClientError::Api(msg));
        }
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let msg = body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("request rejected")
                .to_string();
            return Err(ClientError::Api(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
