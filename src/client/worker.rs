//! Worker API client implementation

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::{VerifyResponse, WebhookResponse, WorkerApi};
use crate::error::{ApiError, Result};
use crate::forms::FormKind;

/// Per-request timeout. The original client had none and a hung request
/// left the page stuck; here a hung request fails as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the intranet worker
pub struct WorkerClient {
    http: HttpClient,
    base_url: String,
}

impl WorkerClient {
    /// Create a new worker client for the given base URL
    pub fn new(base_url: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl WorkerApi for WorkerClient {
    async fn verify(&self, token: &str) -> Result<VerifyResponse> {
        let response = self
            .http
            .post(self.url("/auth/verify"))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(ApiError::from)?;

        // The worker answers verification with a JSON verdict on any status
        response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("verify response: {}", e)).into())
    }

    async fn session_timeout(&self) -> Result<u64> {
        #[derive(Deserialize)]
        struct TimeoutResponse {
            timeout: u64,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            error: Option<String>,
        }

        let response = self
            .http
            .get(self.url("/api/settings/session-timeout"))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            let data: TimeoutResponse = response.json().await.map_err(|e| {
                ApiError::InvalidResponse(format!("session-timeout response: {}", e))
            })?;
            Ok(data.timeout)
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Unexpected status code: {}", status));
            Err(ApiError::Server(message).into())
        }
    }

    async fn set_session_timeout(&self, seconds: u64) -> Result<()> {
        #[derive(Deserialize)]
        struct UpdateResponse {
            #[serde(default)]
            success: bool,
            #[serde(default)]
            error: Option<String>,
        }

        let response = self
            .http
            .post(self.url("/api/settings/session-timeout"))
            .json(&serde_json::json!({ "timeout": seconds }))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let data: UpdateResponse = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("session-timeout update response: {}", e))
        })?;

        // Applied only when both the status and the body say so
        if status.is_success() && data.success {
            Ok(())
        } else {
            Err(ApiError::Server(
                data.error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )
            .into())
        }
    }

    async fn submit_form(
        &self,
        form: FormKind,
        fields: &BTreeMap<String, String>,
    ) -> Result<WebhookResponse> {
        let response = self
            .http
            .post(self.url(&format!("/api/webhook/{}", form.slug())))
            .json(fields)
            .send()
            .await
            .map_err(ApiError::from)?;

        // Success and rejection both arrive as a JSON verdict
        response
            .json::<WebhookResponse>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("webhook response: {}", e)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WorkerClient::new("https://worker.example.test".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = WorkerClient::new("https://worker.example.test/".to_string()).unwrap();
        assert_eq!(
            client.url("/auth/verify"),
            "https://worker.example.test/auth/verify"
        );
    }
}
