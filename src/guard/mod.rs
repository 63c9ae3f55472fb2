//! Page guard: the access-control check run before a protected page is usable
//!
//! The guard walks Unchecked → LocallyValid → RemotelyConfirmed, bailing to
//! Rejected with a redirect target on the way. Local decoding is only a
//! fast-path; access is granted solely on the worker's verdict, and both the
//! displayed identity and the page-permission check use the worker's
//! authoritative payload.

use std::sync::Arc;

use chrono::Utc;

use crate::client::WorkerApi;
use crate::error::{ApiError, Result};
use crate::session::SessionHolder;

/// Guard progress through one page-load check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    LocallyValid,
    RemotelyConfirmed,
    Rejected,
}

/// Why a page was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No token stored, or the stored token does not decode
    NotAuthenticated,
    /// The stored token expired locally (session cleared)
    SessionExpired,
    /// The worker rejected the token (session cleared)
    RemoteInvalid,
    /// The verification request never completed (session kept)
    NetworkError,
    /// Authenticated but lacking the page's required permission
    NotPermitted,
}

impl DenyReason {
    /// Error indicator carried on the redirect query string
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not_authenticated",
            DenyReason::SessionExpired => "session_expired",
            DenyReason::RemoteInvalid => "not_authenticated",
            DenyReason::NetworkError => "network_error",
            DenyReason::NotPermitted => "unauthorized_access",
        }
    }
}

/// Identity rendered into the page header after confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

/// Result of running the guard against a page path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The page is public; the guard has nothing to say
    NotProtected,
    /// Access granted; render this identity
    Granted(Identity),
    /// Access denied; the host should navigate to `redirect`
    Denied { reason: DenyReason, redirect: String },
}

/// A protected sub-page needing a named permission on top of a valid session
#[derive(Debug, Clone)]
pub struct PagePermission {
    /// Substring identifying the page within the protected area
    pub marker: String,
    /// Permission required to view it
    pub permission: String,
}

/// Which paths are guarded and where denials land
#[derive(Debug, Clone)]
pub struct PageRules {
    /// Substring marking a path as protected
    pub protected_marker: String,
    /// Public entry point denials redirect to
    pub public_root: String,
    /// Authenticated landing page for permission denials
    pub dashboard: String,
    /// Per-page permission requirements
    pub page_permissions: Vec<PagePermission>,
}

impl Default for PageRules {
    fn default() -> Self {
        Self {
            protected_marker: "/intranet/".to_string(),
            public_root: "../".to_string(),
            dashboard: "intra-dashboard.html".to_string(),
            page_permissions: vec![PagePermission {
                marker: "intra-admin".to_string(),
                permission: "admin-view".to_string(),
            }],
        }
    }
}

impl PageRules {
    /// Whether the guard applies to this path at all
    pub fn is_protected(&self, path: &str) -> bool {
        path.contains(&self.protected_marker)
    }

    /// The extra permission this path needs, if any
    pub fn required_permission(&self, path: &str) -> Option<&str> {
        self.page_permissions
            .iter()
            .find(|rule| path.contains(&rule.marker))
            .map(|rule| rule.permission.as_str())
    }

    fn deny(&self, reason: DenyReason) -> GuardOutcome {
        let base = match reason {
            DenyReason::NotPermitted => &self.dashboard,
            _ => &self.public_root,
        };
        GuardOutcome::Denied {
            reason,
            redirect: format!("{}?error={}", base, reason.code()),
        }
    }
}

/// Runs the session check for one page load
pub struct PageGuard {
    session: Arc<SessionHolder>,
    client: Arc<dyn WorkerApi>,
    rules: PageRules,
    state: GuardState,
}

impl PageGuard {
    pub fn new(session: Arc<SessionHolder>, client: Arc<dyn WorkerApi>) -> Self {
        Self::with_rules(session, client, PageRules::default())
    }

    pub fn with_rules(
        session: Arc<SessionHolder>,
        client: Arc<dyn WorkerApi>,
        rules: PageRules,
    ) -> Self {
        Self {
            session,
            client,
            rules,
            state: GuardState::Unchecked,
        }
    }

    /// State reached by the last `check` call
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Run the full guard for `path`.
    ///
    /// Failures of the verification round-trip are outcomes, not errors:
    /// `Err` is reserved for broken capabilities (token store I/O) and a
    /// worker response that violates its own contract.
    pub async fn check(&mut self, path: &str) -> Result<GuardOutcome> {
        self.state = GuardState::Unchecked;

        if !self.rules.is_protected(path) {
            log::debug!("guard: {} is not a protected page", path);
            return Ok(GuardOutcome::NotProtected);
        }

        let Some(token) = self.session.token()? else {
            log::debug!("guard: no token, rejecting");
            self.state = GuardState::Rejected;
            return Ok(self.rules.deny(DenyReason::NotAuthenticated));
        };

        // Optimistic local check, to skip a doomed verify call. An expired
        // token is cleared here (implicit logout); an undecodable one is
        // kept, but still rejected locally.
        if self.session.current_claims(Utc::now())?.is_none() {
            let reason = if self.session.token()?.is_none() {
                DenyReason::SessionExpired
            } else {
                DenyReason::NotAuthenticated
            };
            log::debug!("guard: local check failed ({:?})", reason);
            self.state = GuardState::Rejected;
            return Ok(self.rules.deny(reason));
        }

        self.state = GuardState::LocallyValid;
        log::debug!("guard: locally valid, verifying with worker");

        let verdict = match self.client.verify(&token).await {
            Ok(verdict) => verdict,
            Err(err) => {
                // Connectivity failure, not a credential failure: keep the
                // token and route to the network-error entry variant.
                log::warn!("guard: verification request failed: {}", err);
                self.state = GuardState::Rejected;
                return Ok(self.rules.deny(DenyReason::NetworkError));
            }
        };

        if !verdict.valid {
            log::debug!("guard: worker rejected token, clearing session");
            self.session.logout()?;
            self.state = GuardState::Rejected;
            return Ok(self.rules.deny(DenyReason::RemoteInvalid));
        }

        let payload = verdict.payload.ok_or_else(|| {
            ApiError::InvalidResponse("valid verification without payload".to_string())
        })?;

        self.state = GuardState::RemotelyConfirmed;
        log::debug!(
            "guard: confirmed {} ({}) for {}",
            payload.username,
            payload.role,
            path
        );

        // Page-level authorization: still authenticated on failure, so the
        // redirect lands on the dashboard rather than logging out.
        if let Some(required) = self.rules.required_permission(path) {
            if !payload.grants(required) {
                log::debug!("guard: {} lacks '{}' for {}", payload.username, required, path);
                return Ok(self.rules.deny(DenyReason::NotPermitted));
            }
        }

        Ok(GuardOutcome::Granted(Identity {
            username: payload.username,
            role: payload.role,
        }))
    }
}
