// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat completions gateway.
//!
//! Exactly one attempt per call. A 429 is reported as [`EcosortError::RateLimited`]
//! and left to the user to retry, since every attempt is billed.

use std::time::Duration;

use ecosort_core::EcosortError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again in a moment.";
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "AI credits exhausted. Please add credits to continue.";

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GatewayClient {
    /// Creates a client authenticating with `Authorization: Bearer <api_key>`.
    ///
    /// `base_url` is the API root; `/chat/completions` is appended.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, EcosortError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| EcosortError::Config(format!("invalid API key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| EcosortError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one completion request.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, EcosortError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| EcosortError::Upstream {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "gateway response received");

        if status.is_success() {
            let body = response.text().await.map_err(|e| EcosortError::Upstream {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;
            return serde_json::from_str(&body).map_err(|e| EcosortError::Upstream {
                message: format!("failed to parse gateway response: {e}"),
                source: Some(Box::new(e)),
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "gateway returned an error status");
        Err(status_error(status, &body))
    }
}

/// Map a non-2xx status to the error taxonomy.
fn status_error(status: StatusCode, body: &str) -> EcosortError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => EcosortError::RateLimited {
            message: RATE_LIMITED_MESSAGE.to_string(),
        },
        StatusCode::PAYMENT_REQUIRED => EcosortError::QuotaExhausted {
            message: QUOTA_EXHAUSTED_MESSAGE.to_string(),
        },
        _ => {
            let detail = serde_json::from_str::<ApiErrorResponse>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            EcosortError::Upstream {
                message: format!("gateway returned {status}: {detail}"),
                source: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, MessageContent};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GatewayClient {
        GatewayClient::new("test-key", base_url, Duration::from_secs(5)).unwrap()
    }

    fn test_request() -> ChatRequest {
        ChatRequest {
            model: "google/gemini-2.5-flash".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: MessageContent::Text("hi".into()),
            }],
        }
    }

    #[test]
    fn endpoint_appends_completions_path() {
        let client = test_client("http://localhost:4000/v1/");
        assert_eq!(client.endpoint(), "http://localhost:4000/v1/chat/completions");
    }

    #[tokio::test]
    async fn success_returns_parsed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{}"}}]
            })))
            .mount(&server)
            .await;

        let response = test_client(&server.uri()).complete(&test_request()).await.unwrap();
        assert_eq!(response.first_content(), Some("{}"));
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EcosortError::RateLimited { ref message } if message == RATE_LIMITED_MESSAGE));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn payment_required_is_quota_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EcosortError::QuotaExhausted { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn other_status_is_upstream_with_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"message": "model overloaded"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, EcosortError::Upstream { .. }));
        assert!(msg.contains("model overloaded"), "got: {msg}");
    }

    #[tokio::test]
    async fn non_json_success_body_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EcosortError::Upstream { .. }));
    }
}
