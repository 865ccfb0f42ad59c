//! HTTP client with bounded retry and backoff

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use super::constants::{BASE_URL, MAX_RETRIES};

/// Retry tuning. All waits scale on `base_delay`: rate-limit waits are
/// `Retry-After` units, everything else waits `attempt` units.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Fatal API failure, surfaced once retries are exhausted.
#[derive(Debug)]
pub enum ApiError {
    Http { status: u16, body: String },
    Transport(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HubSpot HTTP {}: {}", status, body),
            ApiError::Transport(message) => write!(f, "HubSpot request failed: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

pub struct HubSpotClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry: RetryConfig,
}

impl HubSpotClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
            token: token.into(),
            retry: RetryConfig::default(),
        })
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        self.request_json(Method::GET, path, None).await
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<serde_json::Value> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// Send with bearer auth, retrying on 429, transport faults and error
    /// statuses. Attempts are counted from 1; `max_retries` bounds the
    /// extras, so the default allows six tries in total.
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().simple().to_string();
        let mut attempt: u32 = 1;

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&self.token);
            if let Some(body) = &body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt <= self.retry.max_retries
                    {
                        let delay = self.retry.base_delay * retry_after_units(&response).max(1);
                        warn!(
                            "[{}] {} {} rate limited, retrying in {:?} (attempt {})",
                            request_id, method, url, delay, attempt
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if status.is_success() {
                        debug!(
                            "[{}] {} {} -> {} (attempt {})",
                            request_id,
                            method,
                            url,
                            status.as_u16(),
                            attempt
                        );
                        return response
                            .json::<serde_json::Value>()
                            .await
                            .context("Failed to decode HubSpot response");
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if attempt <= self.retry.max_retries {
                        let delay = self.retry.base_delay * attempt;
                        warn!(
                            "[{}] {} {} -> HTTP {}, retrying in {:?} (attempt {})",
                            request_id,
                            method,
                            url,
                            status.as_u16(),
                            delay,
                            attempt
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(ApiError::Http {
                        status: status.as_u16(),
                        body: body_text,
                    }
                    .into());
                }
                Err(err) => {
                    if attempt <= self.retry.max_retries {
                        let delay = self.retry.base_delay * attempt;
                        warn!(
                            "[{}] {} {} failed ({}), retrying in {:?} (attempt {})",
                            request_id, method, url, err, delay, attempt
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(ApiError::Transport(err.to_string()).into());
                }
            }
        }
    }
}

/// `Retry-After` seconds; 1 when the header is absent or unparseable.
fn retry_after_units(response: &Response) -> u32 {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(uri: &str) -> HubSpotClient {
        HubSpotClient::new("test-token")
            .unwrap()
            .with_base_url(uri)
            .with_retry_config(RetryConfig {
                max_retries: 5,
                base_delay: Duration::from_millis(2),
            })
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/deals"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let value = client.get_json("/crm/v3/objects/deals").await.unwrap();
        assert_eq!(value["results"], json!([]));
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let value = client.get_json("/ping").await.unwrap();
        assert_eq!(value["ok"], json!(true));
    }

    #[tokio::test]
    async fn honors_retry_after_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let started = std::time::Instant::now();
        client.get_json("/ping").await.unwrap();
        // three backoff units at 2ms each
        assert!(started.elapsed() >= Duration::from_millis(6));
    }

    #[tokio::test]
    async fn rate_limit_exhausts_after_six_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(6)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_json("/ping").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("HubSpot HTTP 429"), "got: {message}");
        assert!(message.contains("slow down"));
    }

    #[tokio::test]
    async fn server_errors_retry_then_succeed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let value = client.get_json("/ping").await.unwrap();
        assert_eq!(value["ok"], json!(true));
    }

    #[tokio::test]
    async fn persistent_server_errors_become_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(6)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_json("/ping").await.unwrap_err();
        assert!(err.to_string().contains("HubSpot HTTP 502"));
    }
}
