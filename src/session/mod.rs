//! Session ownership: the token slot and its lifecycle
//!
//! The browser keeps the token in tab-scoped session storage; here the slot
//! is a [`TokenStore`] capability injected into [`SessionHolder`], so hosts
//! can back it with a config file and tests with memory.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::Result;

pub mod claims;

pub use claims::{Claims, DecodeError};

/// Query parameter carrying the token on the post-login redirect
const TOKEN_PARAM: &str = "token";

/// The single browser-session-scoped token slot
pub trait TokenStore: Send + Sync {
    /// Currently stored token, if any
    fn get(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the stored token
    fn clear(&self) -> Result<()>;
}

/// In-memory token slot
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().expect("token slot poisoned").clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot.lock().expect("token slot poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().expect("token slot poisoned") = None;
        Ok(())
    }
}

/// Owns the bearer token, its storage lifecycle, and local claim decoding
pub struct SessionHolder {
    store: Box<dyn TokenStore>,
}

impl SessionHolder {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Currently stored token, if any
    pub fn token(&self) -> Result<Option<String>> {
        self.store.get()
    }

    /// Capture a token handed over in the URL after login.
    ///
    /// If the URL carries a `token` query parameter, the token is stored and
    /// the cleaned URL (parameter stripped, everything else kept) is returned
    /// so the host can *replace* the visible location and keep the token out
    /// of history. A URL without the parameter stores nothing and returns
    /// `None`, so re-processing a cleaned URL is a no-op.
    pub fn store_from_url(&self, url: &Url) -> Result<Option<Url>> {
        let token = url
            .query_pairs()
            .find(|(k, _)| k == TOKEN_PARAM)
            .map(|(_, v)| v.into_owned());

        let Some(token) = token else {
            return Ok(None);
        };

        self.store.set(&token)?;
        log::debug!("token captured from URL");

        let mut cleaned = url.clone();
        let remaining: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != TOKEN_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if remaining.is_empty() {
            cleaned.set_query(None);
        } else {
            cleaned
                .query_pairs_mut()
                .clear()
                .extend_pairs(remaining.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(Some(cleaned))
    }

    /// Decode the stored token's claims, enforcing expiry.
    ///
    /// Returns `None` when no token is stored, when the token does not decode,
    /// or when its `exp` is at or before `now`. Local expiry is an implicit
    /// logout: the stored token is cleared before returning. Decode failures
    /// leave the slot untouched so the worker gets the final say.
    pub fn current_claims(&self, now: DateTime<Utc>) -> Result<Option<Claims>> {
        let Some(token) = self.store.get()? else {
            return Ok(None);
        };

        let claims = match claims::parse(&token) {
            Ok(claims) => claims,
            Err(err) => {
                log::warn!("stored token failed to decode: {}", err);
                return Ok(None);
            }
        };

        if claims.expired_at(now) {
            log::warn!("stored token expired locally, clearing session");
            self.store.clear()?;
            return Ok(None);
        }

        Ok(Some(claims))
    }

    /// Clear the session. The host is expected to navigate to the public root.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }

    /// Whether the current session grants `permission`.
    ///
    /// Goes through [`Self::current_claims`], so an expired token both denies
    /// and clears the slot.
    pub fn has_permission(&self, permission: &str) -> Result<bool> {
        match self.current_claims(Utc::now())? {
            Some(claims) => Ok(claims.grants(permission)),
            None => Ok(false),
        }
    }
}
