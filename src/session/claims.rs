//! Token claims decoding
//!
//! Tokens are opaque three-part `header.payload.signature` strings. Only the
//! payload segment is read here, and nothing is verified: signature checks
//! belong to the worker. Parsing is pure; expiry enforcement (and its
//! clear-the-store side effect) lives on [`SessionHolder`](super::SessionHolder).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AuthError;

/// Elevated permissions that satisfy checks for lesser ones. This is an
/// explicit table, not a general hierarchy.
const IMPLICATIONS: &[(&str, &str)] = &[("admin-full", "admin-view")];

/// Wildcard permission granting everything
pub const WILDCARD: &str = "*";

/// Decoded token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account name shown in the page header. Workers may omit it on
    /// minimal payloads, so it defaults to empty rather than failing decode.
    #[serde(default)]
    pub username: String,

    /// Display label for the account's role
    #[serde(default)]
    pub role: String,

    /// Capability labels, possibly containing the `*` wildcard
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Expiry as a Unix timestamp; absent means the token never expires locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Whether the token is expired at `now`. Tokens without `exp` never are.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp <= now.timestamp(),
            None => false,
        }
    }

    /// Whether these claims grant `permission`
    pub fn grants(&self, permission: &str) -> bool {
        if self.permissions.iter().any(|p| p == WILDCARD) {
            return true;
        }

        if self.permissions.iter().any(|p| p == permission) {
            return true;
        }

        IMPLICATIONS.iter().any(|(holder, implied)| {
            *implied == permission && self.permissions.iter().any(|p| p == holder)
        })
    }
}

/// Reasons a token failed local decoding
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected 3 token segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not valid base64url: {0}")]
    Base64(String),

    #[error("payload is not valid claims JSON: {0}")]
    Json(String),
}

impl From<DecodeError> for AuthError {
    fn from(err: DecodeError) -> Self {
        AuthError::Decode(err.to_string())
    }
}

/// Decode base64url (URL-safe base64 without padding)
fn base64_decode_url(input: &str) -> std::result::Result<Vec<u8>, String> {
    use base64::{Engine as _, engine::general_purpose};

    // Base64url uses - instead of + and _ instead of /
    let standard_b64 = input.replace('-', "+").replace('_', "/");

    // Add padding if needed
    let padding = match standard_b64.len() % 4 {
        0 => "",
        2 => "==",
        3 => "=",
        _ => return Err("Invalid base64url length".to_string()),
    };

    let padded = format!("{}{}", standard_b64, padding);

    general_purpose::STANDARD
        .decode(&padded)
        .map_err(|e| e.to_string())
}

/// Parse the claims payload out of a token. Pure: no expiry check, no
/// storage side effects.
pub fn parse(token: &str) -> std::result::Result<Claims, DecodeError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(DecodeError::SegmentCount(parts.len()));
    }

    let payload_bytes = base64_decode_url(parts[1]).map_err(DecodeError::Base64)?;

    serde_json::from_slice(&payload_bytes).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Build a structurally valid token around the given payload JSON.
/// Test helper only; the signature is junk.
#[cfg(test)]
pub(crate) fn token_with_payload(payload: &str) -> String {
    use base64::{Engine as _, engine::general_purpose};
    let encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload);
    format!("header.{}.sig", encoded)
}
