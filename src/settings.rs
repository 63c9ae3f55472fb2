//! Admin settings panel: the session-timeout setting
//!
//! Reads need `admin-view`, writes need `admin-full`. A denied call never
//! reaches the worker; hosts log the denial and leave the control alone.
//! The worker owns the value in seconds, the control displays whole minutes.

use std::sync::Arc;

use crate::client::WorkerApi;
use crate::error::{AuthError, Result};
use crate::session::SessionHolder;

/// Permission to read admin settings
pub const VIEW_PERMISSION: &str = "admin-view";

/// Permission to change admin settings
pub const UPDATE_PERMISSION: &str = "admin-full";

/// Permission-gated access to the session-timeout setting
pub struct SettingsPanel {
    session: Arc<SessionHolder>,
    client: Arc<dyn WorkerApi>,
}

impl SettingsPanel {
    pub fn new(session: Arc<SessionHolder>, client: Arc<dyn WorkerApi>) -> Self {
        Self { session, client }
    }

    /// Fetch the session timeout, in whole minutes
    pub async fn load(&self) -> Result<u64> {
        if !self.session.has_permission(VIEW_PERMISSION)? {
            return Err(AuthError::PermissionDenied(VIEW_PERMISSION.to_string()).into());
        }

        let seconds = self.client.session_timeout().await?;
        Ok(seconds / 60)
    }

    /// Change the session timeout to `minutes`.
    ///
    /// On any error the displayed value was not applied; callers re-load it
    /// rather than showing the unsaved selection.
    pub async fn update(&self, minutes: u64) -> Result<()> {
        if !self.session.has_permission(UPDATE_PERMISSION)? {
            return Err(AuthError::PermissionDenied(UPDATE_PERMISSION.to_string()).into());
        }

        self.client.set_session_timeout(minutes * 60).await?;
        log::debug!("session timeout updated to {} minutes", minutes);
        Ok(())
    }
}
