//! Mock worker client for testing
//!
//! Provides a mock implementation of the worker API trait for unit testing
//! without making real HTTP calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{VerifyResponse, WebhookResponse, WorkerApi};
use crate::error::{ApiError, Result};
use crate::forms::FormKind;
use crate::session::Claims;

/// Mock worker client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockWorkerClient::new().with_timeout_seconds(1800).await;
/// let seconds = mock.session_timeout().await?;
/// assert_eq!(seconds, 1800);
/// ```
pub struct MockWorkerClient {
    /// Verdict to return from verify
    verify: Arc<Mutex<Option<VerifyResponse>>>,
    /// Seconds to return from session_timeout
    timeout_seconds: Arc<Mutex<Option<u64>>>,
    /// Verdict to return from submit_form
    webhook: Arc<Mutex<Option<WebhookResponse>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured form submissions for test assertions
    submissions: Arc<Mutex<Vec<CapturedSubmission>>>,
    /// Captured timeout updates, in seconds
    timeout_updates: Arc<Mutex<Vec<u64>>>,
}

impl Default for MockWorkerClient {
    fn default() -> Self {
        Self {
            verify: Arc::new(Mutex::new(None)),
            timeout_seconds: Arc::new(Mutex::new(None)),
            webhook: Arc::new(Mutex::new(None)),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            submissions: Arc::new(Mutex::new(Vec::new())),
            timeout_updates: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub verify: usize,
    pub session_timeout: usize,
    pub set_session_timeout: usize,
    pub submit_form: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.verify + self.session_timeout + self.set_session_timeout + self.submit_form
    }
}

/// A captured form submission for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedSubmission {
    pub form: FormKind,
    pub fields: BTreeMap<String, String>,
}

impl MockWorkerClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure verify to accept the token with the given claims payload.
    pub async fn with_valid_session(self, claims: Claims) -> Self {
        *self.verify.lock().await = Some(VerifyResponse {
            valid: true,
            payload: Some(claims),
        });
        self
    }

    /// Configure verify to reject the token.
    pub async fn with_invalid_session(self) -> Self {
        *self.verify.lock().await = Some(VerifyResponse {
            valid: false,
            payload: None,
        });
        self
    }

    /// Configure the timeout value returned from session_timeout.
    pub async fn with_timeout_seconds(self, seconds: u64) -> Self {
        *self.timeout_seconds.lock().await = Some(seconds);
        self
    }

    /// Configure the verdict returned from submit_form.
    pub async fn with_webhook_response(self, response: WebhookResponse) -> Self {
        *self.webhook.lock().await = Some(response);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured form submissions for test assertions.
    pub async fn submissions(&self) -> Vec<CapturedSubmission> {
        self.submissions.lock().await.clone()
    }

    /// Get all captured timeout updates (seconds) for test assertions.
    pub async fn timeout_updates(&self) -> Vec<u64> {
        self.timeout_updates.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl WorkerApi for MockWorkerClient {
    async fn verify(&self, _token: &str) -> Result<VerifyResponse> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.verify += 1;
        drop(counts);

        let verify = self.verify.lock().await;
        Ok(verify.clone().unwrap_or(VerifyResponse {
            valid: false,
            payload: None,
        }))
    }

    async fn session_timeout(&self) -> Result<u64> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.session_timeout += 1;
        drop(counts);

        let seconds = self.timeout_seconds.lock().await;
        Ok(seconds.unwrap_or(1800))
    }

    async fn set_session_timeout(&self, seconds: u64) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.set_session_timeout += 1;
        drop(counts);

        *self.timeout_seconds.lock().await = Some(seconds);
        self.timeout_updates.lock().await.push(seconds);
        Ok(())
    }

    async fn submit_form(
        &self,
        form: FormKind,
        fields: &BTreeMap<String, String>,
    ) -> Result<WebhookResponse> {
        self.submissions.lock().await.push(CapturedSubmission {
            form,
            fields: fields.clone(),
        });
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.submit_form += 1;
        drop(counts);

        let webhook = self.webhook.lock().await;
        Ok(webhook.clone().unwrap_or(WebhookResponse {
            success: true,
            case_number: Some("MOCK-1".to_string()),
            error: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: &str) -> Claims {
        Claims {
            username: username.to_string(),
            role: "Agent".to_string(),
            permissions: vec![],
            exp: None,
        }
    }

    #[tokio::test]
    async fn test_mock_default_verify_rejects() {
        let mock = MockWorkerClient::new();

        let verdict = mock.verify("a.b.c").await.unwrap();
        assert!(!verdict.valid);
    }

    #[tokio::test]
    async fn test_mock_with_valid_session() {
        let mock = MockWorkerClient::new()
            .with_valid_session(claims("jdoe"))
            .await;

        let verdict = mock.verify("a.b.c").await.unwrap();
        assert!(verdict.valid);
        assert_eq!(verdict.payload.unwrap().username, "jdoe");
    }

    #[tokio::test]
    async fn test_mock_with_error_is_one_shot() {
        let mock = MockWorkerClient::new()
            .with_error(ApiError::Network("offline".to_string()))
            .await;

        assert!(mock.verify("a.b.c").await.is_err());

        // Error is consumed, next call succeeds
        assert!(mock.verify("a.b.c").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_timeout_round_trip() {
        let mock = MockWorkerClient::new().with_timeout_seconds(2700).await;

        assert_eq!(mock.session_timeout().await.unwrap(), 2700);

        mock.set_session_timeout(900).await.unwrap();
        assert_eq!(mock.session_timeout().await.unwrap(), 900);
        assert_eq!(mock.timeout_updates().await, vec![900]);
    }

    #[tokio::test]
    async fn test_mock_captures_submissions() {
        let mock = MockWorkerClient::new();

        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Jane Doe".to_string());
        mock.submit_form(FormKind::Attorney, &fields).await.unwrap();

        let captured = mock.submissions().await;
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].form, FormKind::Attorney);
        assert_eq!(captured[0].fields.get("name").unwrap(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_mock_call_counts() {
        let mock = MockWorkerClient::new();

        mock.verify("a.b.c").await.unwrap();
        mock.verify("a.b.c").await.unwrap();
        mock.session_timeout().await.unwrap();

        let counts = mock.call_counts().await;
        assert_eq!(counts.verify, 2);
        assert_eq!(counts.session_timeout, 1);
        assert_eq!(counts.total(), 3);
    }
}
