//! Explicitly passed session context.
//!
//! [`SessionContext`] is built once from storage and changes only through
//! [`SessionContext::sign_in`], [`SessionContext::adopt_token`] and
//! [`SessionContext::sign_out`]. Controllers receive it by reference.

use std::sync::Arc;

use lavender_core::CustomerId;
use lavender_core::auth_form::Credentials;
use lavender_core::session::{Claims, Session, TokenError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::storage::{SharedStorage, StorageError, keys};

/// Role required by the admin screens.
pub const ADMIN_ROLE: &str = "Admin";

/// Errors from signing in or adopting a token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("token could not be decoded: {0}")]
    Token(#[from] TokenError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of a route guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Anonymous; the caller should show the sign-in form.
    LoginRequired,
    /// Signed in with a role outside the allow-list.
    Forbidden,
}

/// The signed-in state shared by all screens.
#[derive(Debug)]
pub struct SessionContext {
    storage: SharedStorage,
    token: Option<Arc<SecretString>>,
    session: Session,
}

impl SessionContext {
    /// Rebuild the session from the stored token.
    ///
    /// A stored token that does not decode gives an anonymous session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage backend cannot be read.
    pub fn restore(storage: SharedStorage) -> Result<Self, StorageError> {
        let raw = storage.get(keys::TOKEN)?;
        let session = Session::derive(raw.as_deref());
        if raw.is_some() && !session.is_authenticated() {
            warn!("Stored token could not be decoded, continuing anonymously");
        }

        Ok(Self {
            storage,
            token: raw.map(|t| Arc::new(SecretString::from(t))),
            session,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn claims(&self) -> Option<&Claims> {
        self.session.claims()
    }

    /// Role of the signed-in user, or `"none"`.
    #[must_use]
    pub fn role(&self) -> String {
        self.session.role()
    }

    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Log in and adopt the returned token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the login is refused or fails,
    /// `SessionError::Token` if the issued token cannot be decoded (nothing is
    /// stored in that case), or `SessionError::Storage`.
    pub async fn sign_in(
        &mut self,
        api: &ApiClient,
        credentials: &Credentials,
    ) -> Result<(), SessionError> {
        let token = api.anonymous().login(credentials).await?;
        self.adopt_token(token)
    }

    /// Decode, persist and adopt an access token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Token` if the token does not decode, or
    /// `SessionError::Storage` if it cannot be persisted.
    pub fn adopt_token(&mut self, token: SecretString) -> Result<(), SessionError> {
        let claims = Claims::decode(token.expose_secret())?;
        self.storage.set(keys::TOKEN, token.expose_secret())?;

        info!(subject = ?claims.subject(), role = %claims.role(), "Signed in");
        self.token = Some(Arc::new(token));
        self.session = Session::authenticated(claims);
        Ok(())
    }

    /// Clear every persisted key (token and cart alike) and go anonymous.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be cleared. The in-memory
    /// session is reset either way.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.session = Session::anonymous();
        info!("Signed out");
        self.storage.clear()
    }

    /// Customer id for order submission.
    ///
    /// Falls back to re-decoding the stored raw token when the in-memory
    /// claims carry none.
    #[must_use]
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.session
            .claims()
            .and_then(Claims::customer_id)
            .or_else(|| {
                let raw = self.storage.get(keys::TOKEN).ok().flatten()?;
                Claims::decode(&raw).ok()?.customer_id()
            })
    }

    /// Check access for a screen restricted to `allowed_roles`.
    ///
    /// An empty list admits any signed-in user.
    #[must_use]
    pub fn authorize(&self, allowed_roles: &[&str]) -> Access {
        if !self.session.is_authenticated() {
            return Access::LoginRequired;
        }
        if allowed_roles.is_empty() {
            return Access::Granted;
        }
        let role = self.session.role();
        if allowed_roles.iter().any(|allowed| *allowed == role) {
            Access::Granted
        } else {
            Access::Forbidden
        }
    }

    /// `api` with this session's bearer token attached, if one is stored.
    #[must_use]
    pub fn client(&self, api: &ApiClient) -> ApiClient {
        self.token.as_ref().map_or_else(
            || api.anonymous(),
            |token| api.authenticated(Arc::clone(token)),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::{Value, json};

    use super::*;
    use crate::storage::MemoryStorage;

    fn token_for(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    fn memory() -> SharedStorage {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_restore_without_token_is_anonymous() {
        let ctx = SessionContext::restore(memory()).unwrap();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.role(), "none");
        assert_eq!(ctx.authorize(&[]), Access::LoginRequired);
    }

    #[test]
    fn test_restore_with_garbage_token_is_anonymous() {
        let storage = memory();
        storage.set(keys::TOKEN, "not-a-token").unwrap();
        let ctx = SessionContext::restore(storage).unwrap();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.customer_id(), None);
    }

    #[test]
    fn test_adopt_token_persists_and_authenticates() {
        let storage = memory();
        let mut ctx = SessionContext::restore(Arc::clone(&storage)).unwrap();
        let token = token_for(&json!({"sub": "ana", "role": "Customer", "customerId": 17}));
        ctx.adopt_token(SecretString::from(token.clone())).unwrap();

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role(), "Customer");
        assert_eq!(ctx.customer_id(), Some(CustomerId::new("17")));
        assert_eq!(storage.get(keys::TOKEN).unwrap(), Some(token));

        let restored = SessionContext::restore(storage).unwrap();
        assert_eq!(restored.claims().unwrap().subject().as_deref(), Some("ana"));
    }

    #[test]
    fn test_undecodable_token_is_not_stored() {
        let storage = memory();
        let mut ctx = SessionContext::restore(Arc::clone(&storage)).unwrap();
        let err = ctx
            .adopt_token(SecretString::from("only-one-segment"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Token(_)));
        assert!(!ctx.is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let storage = memory();
        storage.set(keys::CART, r#"[{"productId":"A"}]"#).unwrap();
        let mut ctx = SessionContext::restore(Arc::clone(&storage)).unwrap();
        ctx.adopt_token(SecretString::from(token_for(&json!({"sub": "ana"}))))
            .unwrap();

        ctx.sign_out().unwrap();
        assert!(!ctx.is_authenticated());
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_customer_id_candidates() {
        let storage = memory();
        let mut ctx = SessionContext::restore(storage).unwrap();
        ctx.adopt_token(SecretString::from(token_for(&json!({"sub": "u-1", "id": "c-2"}))))
            .unwrap();
        assert_eq!(ctx.customer_id(), Some(CustomerId::new("c-2")));

        ctx.adopt_token(SecretString::from(token_for(&json!({"sub": "u-1"}))))
            .unwrap();
        assert_eq!(ctx.customer_id(), Some(CustomerId::new("u-1")));
    }

    #[test]
    fn test_customer_id_falls_back_to_stored_token() {
        let storage = memory();
        let ctx = SessionContext::restore(Arc::clone(&storage)).unwrap();
        assert_eq!(ctx.customer_id(), None);

        storage
            .set(keys::TOKEN, &token_for(&json!({"customerId": 77, "role": "Customer"})))
            .unwrap();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.customer_id(), Some(CustomerId::new("77")));
    }

    #[test]
    fn test_customer_id_prefers_claims_then_rereads_storage() {
        let storage = memory();
        let mut ctx = SessionContext::restore(Arc::clone(&storage)).unwrap();
        ctx.adopt_token(SecretString::from(token_for(&json!({"role": "Admin"}))))
            .unwrap();
        assert_eq!(ctx.customer_id(), None);

        storage
            .set(keys::TOKEN, &token_for(&json!({"customerId": "c-9"})))
            .unwrap();
        assert_eq!(ctx.role(), "Admin");
        assert_eq!(ctx.customer_id(), Some(CustomerId::new("c-9")));
    }

    #[test]
    fn test_authorize_roles() {
        let mut ctx = SessionContext::restore(memory()).unwrap();
        ctx.adopt_token(SecretString::from(token_for(&json!({
            "sub": "root",
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": "Admin"
        }))))
        .unwrap();
        assert_eq!(ctx.authorize(&[ADMIN_ROLE]), Access::Granted);
        assert_eq!(ctx.authorize(&[]), Access::Granted);

        ctx.adopt_token(SecretString::from(token_for(&json!({"sub": "ana", "Role": "Customer"}))))
            .unwrap();
        assert_eq!(ctx.authorize(&[ADMIN_ROLE]), Access::Forbidden);
        assert_eq!(ctx.authorize(&["Customer", ADMIN_ROLE]), Access::Granted);
    }
}
