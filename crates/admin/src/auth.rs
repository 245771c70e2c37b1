//! Role guard for admin screens.

use lavender_storefront::session::{ADMIN_ROLE, Access, SessionContext};
use thiserror::Error;
use tracing::warn;

/// Why an admin screen refused to open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminAuthRejection {
    /// Nobody is signed in.
    #[error("Please sign in to continue.")]
    LoginRequired,

    /// Signed in, but without the admin role.
    #[error("This screen requires the Admin role (current role: {role}).")]
    Forbidden { role: String },
}

/// Require a signed-in user with the `Admin` role.
///
/// # Errors
///
/// Returns `AdminAuthRejection` describing what is missing.
pub fn require_admin(session: &SessionContext) -> Result<(), AdminAuthRejection> {
    require_roles(session, &[ADMIN_ROLE])
}

/// Require a signed-in user whose role is in `allowed_roles`.
///
/// An empty list admits any signed-in user.
///
/// # Errors
///
/// Returns `AdminAuthRejection` describing what is missing.
pub fn require_roles(
    session: &SessionContext,
    allowed_roles: &[&str],
) -> Result<(), AdminAuthRejection> {
    match session.authorize(allowed_roles) {
        Access::Granted => Ok(()),
        Access::LoginRequired => Err(AdminAuthRejection::LoginRequired),
        Access::Forbidden => {
            let role = session.role();
            warn!(role = %role, "Screen refused for role");
            Err(AdminAuthRejection::Forbidden { role })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use lavender_storefront::storage::{MemoryStorage, SharedStorage};
    use secrecy::SecretString;

    use super::*;

    fn session_with(payload: &str) -> SessionContext {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let mut session = SessionContext::restore(storage).unwrap();
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload));
        session.adopt_token(SecretString::from(token)).unwrap();
        session
    }

    #[test]
    fn test_anonymous_must_sign_in() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let session = SessionContext::restore(storage).unwrap();
        assert_eq!(
            require_admin(&session),
            Err(AdminAuthRejection::LoginRequired)
        );
    }

    #[test]
    fn test_admin_role_admitted() {
        let session = session_with(r#"{"sub":"root","role":"Admin"}"#);
        assert_eq!(require_admin(&session), Ok(()));
    }

    #[test]
    fn test_customer_forbidden() {
        let session = session_with(r#"{"sub":"ana","role":"Customer"}"#);
        let err = require_admin(&session).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This screen requires the Admin role (current role: Customer)."
        );
        assert_eq!(require_roles(&session, &[]), Ok(()));
    }
}
