//! Access token claims and session derivation.
//!
//! The client never verifies token signatures (it holds no key); it only reads
//! the payload to decide what to show. The server stays authoritative for
//! every request.
//!
//! Different token issuers put the same logical field under different claim
//! names. Lookups try an ordered list of candidate keys and return the first
//! non-empty value.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::CustomerId;

/// Candidate claim names for the user's role, in priority order.
pub const ROLE_CLAIMS: [&str; 3] = [
    "role",
    "Role",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

/// Candidate claim names for the customer id, in priority order.
pub const CUSTOMER_ID_CLAIMS: [&str; 3] = ["customerId", "id", "sub"];

/// Role reported when no role claim is present.
pub const NO_ROLE: &str = "none";

/// Errors that can occur when decoding an access token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token does not have a payload segment.
    #[error("token is not in header.payload.signature form")]
    Malformed,
    /// The payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The payload is not a JSON object.
    #[error("token payload is not a JSON object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Key/value data decoded from an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Decode the payload of a JWT-shaped token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] if the token has no payload segment, the segment
    /// is not base64url, or it does not decode to a JSON object.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let payload = token
            .trim()
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or(TokenError::Malformed)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let map: Map<String, Value> = serde_json::from_slice(&bytes)?;
        Ok(Self(map))
    }

    /// Build claims from an already-decoded map.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// First non-empty value among `keys`, rendered as a string.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// The `sub` claim.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.first_of(&["sub"])
    }

    /// The user's role, or [`NO_ROLE`] if no role claim is present.
    #[must_use]
    pub fn role(&self) -> String {
        self.first_of(&ROLE_CLAIMS)
            .unwrap_or_else(|| NO_ROLE.to_string())
    }

    /// The customer id to place orders under.
    #[must_use]
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.first_of(&CUSTOMER_ID_CLAIMS).map(CustomerId::from)
    }

    /// Token expiry from the `exp` claim, if present.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.0.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }
}

/// Authenticated or anonymous client state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    claims: Option<Claims>,
}

impl Session {
    /// The anonymous session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { claims: None }
    }

    /// An authenticated session with the given claims.
    #[must_use]
    pub const fn authenticated(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// Derive a session from a raw stored token.
    ///
    /// An absent token or one that fails to decode yields the anonymous
    /// session. This never fails.
    #[must_use]
    pub fn derive(raw_token: Option<&str>) -> Self {
        raw_token
            .and_then(|token| Claims::decode(token).ok())
            .map_or_else(Self::anonymous, Self::authenticated)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    #[must_use]
    pub const fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Role of the signed-in user, or [`NO_ROLE`].
    #[must_use]
    pub fn role(&self) -> String {
        self.claims
            .as_ref()
            .map_or_else(|| NO_ROLE.to_string(), Claims::role)
    }
}
