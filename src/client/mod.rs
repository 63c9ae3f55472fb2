//! Intranet worker API client

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::forms::FormKind;
use crate::session::Claims;

#[cfg(test)]
pub mod mock;
pub mod worker;

#[cfg(test)]
pub use mock::MockWorkerClient;
pub use worker::WorkerClient;

/// Worker API trait
///
/// One method per worker endpoint; every call is a single independent
/// request with no retries.
#[async_trait]
pub trait WorkerApi: Send + Sync {
    /// Verify a token's signature and expiry server-side
    async fn verify(&self, token: &str) -> Result<VerifyResponse>;

    /// Fetch the session timeout setting, in seconds
    async fn session_timeout(&self) -> Result<u64>;

    /// Update the session timeout setting, in seconds.
    ///
    /// `Ok(())` means the worker reported `success: true`; anything else is
    /// an error carrying the worker's message.
    async fn set_session_timeout(&self, seconds: u64) -> Result<()>;

    /// Submit a form's fields to its webhook endpoint.
    ///
    /// Returns the worker's verdict as data: a declined submission is an
    /// `Ok` response with `success: false`, not an `Err`. Only transport
    /// and decoding failures are errors.
    async fn submit_form(
        &self,
        form: FormKind,
        fields: &BTreeMap<String, String>,
    ) -> Result<WebhookResponse>;
}

/// Verification verdict from `POST /auth/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// Whether the worker accepted the token
    pub valid: bool,

    /// Authoritative claims, present when valid
    #[serde(default)]
    pub payload: Option<Claims>,
}

/// Webhook verdict from `POST /api/webhook/{form}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// Whether the submission was accepted
    pub success: bool,

    /// Server-issued reference number, present on success
    #[serde(default)]
    pub case_number: Option<String>,

    /// Human-readable rejection message, present on failure
    #[serde(default)]
    pub error: Option<String>,
}
