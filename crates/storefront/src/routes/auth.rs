//! Login and registration screen.
//!
//! Validation runs before any request. In registration mode a successful
//! sign-up persists the issued token and then logs in with the same
//! credentials. Every exit path clears the loading flag.

use askama::Template;
use lavender_core::auth_form::{AuthForm, AuthMode, Credentials};
use reqwest::StatusCode;
use tracing::{error, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::session::{SessionContext, SessionError};

// =============================================================================
// Messages
// =============================================================================

pub const LOGIN_REJECTED: &str = "Invalid username or password.";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const EMAIL_TAKEN: &str = "This email address is already registered.";
pub const SERVER_FAILURE: &str = "Internal server error. Please try again later.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";
pub const AUTHENTICATION_ERROR: &str = "Authentication error";

/// Result of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field validation failed; no request was sent.
    Invalid,
    /// The request failed; see the form's general error.
    Failed,
    /// The session is now authenticated.
    SignedIn,
}

// =============================================================================
// Templates
// =============================================================================

/// One field validation message.
#[derive(Clone)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

/// Auth form template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== {{ title }} ==
{% if let Some(error) = general_error -%}
! {{ error }}
{% endif -%}
{% for e in field_errors -%}
  {{ e.field }}: {{ e.message }}
{% endfor -%}
({{ toggle_prompt }})"
)]
pub struct AuthFormTemplate {
    pub title: String,
    pub toggle_prompt: String,
    pub general_error: Option<String>,
    pub field_errors: Vec<FieldErrorView>,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller for the auth form.
#[derive(Debug, Default)]
pub struct AuthController {
    form: AuthForm,
}

impl AuthController {
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self {
            form: AuthForm::new(mode),
        }
    }

    #[must_use]
    pub const fn form(&self) -> &AuthForm {
        &self.form
    }

    /// Mutable access for entering field values.
    pub const fn form_mut(&mut self) -> &mut AuthForm {
        &mut self.form
    }

    /// Switch between login and registration.
    pub fn toggle_mode(&mut self) {
        self.form.toggle_mode();
    }

    /// Validate and submit the form.
    ///
    /// Failures are reported through the form's field and general errors.
    #[instrument(skip_all, fields(mode = ?self.form.mode()))]
    pub async fn submit(&mut self, api: &ApiClient, session: &mut SessionContext) -> SubmitOutcome {
        self.form.clear_general_error();
        if !self.form.validate() {
            return SubmitOutcome::Invalid;
        }

        self.form.set_loading(true);
        let result = match self.form.mode() {
            AuthMode::Login => sign_in(api, session, &self.form.credentials()).await,
            AuthMode::Register => self.register_then_sign_in(api, session).await,
        };
        self.form.set_loading(false);

        match result {
            Ok(()) => SubmitOutcome::SignedIn,
            Err(message) => {
                self.form.set_general_error(message);
                SubmitOutcome::Failed
            }
        }
    }

    async fn register_then_sign_in(
        &self,
        api: &ApiClient,
        session: &mut SessionContext,
    ) -> Result<(), String> {
        let Some(registration) = self.form.registration() else {
            return Err(REGISTRATION_FAILED.to_string());
        };

        let token = api
            .anonymous()
            .register(&registration)
            .await
            .map_err(|e| registration_message(&e))?;

        match session.adopt_token(token) {
            Ok(()) | Err(SessionError::Token(_)) => {}
            Err(e) => {
                error!(error = %e, "Failed to persist registration token");
                return Err(UNEXPECTED_ERROR.to_string());
            }
        }

        sign_in(api, session, &registration.credentials).await
    }

    /// Snapshot the form into its template.
    #[must_use]
    pub fn view(&self) -> AuthFormTemplate {
        AuthFormTemplate {
            title: self.form.mode().title().to_string(),
            toggle_prompt: self.form.mode().toggle_prompt().to_string(),
            general_error: self.form.general_error().map(str::to_string),
            field_errors: self
                .form
                .field_errors()
                .iter()
                .map(|(field, message)| FieldErrorView {
                    field: field.name().to_string(),
                    message: (*message).to_string(),
                })
                .collect(),
        }
    }
}

async fn sign_in(
    api: &ApiClient,
    session: &mut SessionContext,
    credentials: &Credentials,
) -> Result<(), String> {
    session
        .sign_in(api, credentials)
        .await
        .map_err(|e| match e {
            SessionError::Api(ApiError::Rejected { status, .. }) => {
                warn!(status = %status, "Login rejected");
                LOGIN_REJECTED.to_string()
            }
            SessionError::Token(e) => {
                error!(error = %e, "Issued token could not be decoded");
                AUTHENTICATION_ERROR.to_string()
            }
            other => {
                error!(error = %other, "Login failed");
                UNEXPECTED_ERROR.to_string()
            }
        })
}

/// Message shown for a failed registration.
///
/// The server's own message wins; otherwise 409 and 500 get fixed text.
#[must_use]
pub fn registration_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected {
            message: Some(message),
            ..
        } => message.clone(),
        ApiError::Rejected { status, .. } if *status == StatusCode::CONFLICT => {
            EMAIL_TAKEN.to_string()
        }
        ApiError::Rejected { status, .. } if *status == StatusCode::INTERNAL_SERVER_ERROR => {
            SERVER_FAILURE.to_string()
        }
        ApiError::Rejected { .. } => REGISTRATION_FAILED.to_string(),
        other => {
            error!(error = %other, "Registration request failed");
            UNEXPECTED_ERROR.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lavender_core::auth_form::Field;
    use secrecy::SecretString;

    use super::*;

    fn rejected(status: StatusCode, message: Option<&str>) -> ApiError {
        ApiError::Rejected {
            status,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_registration_message_prefers_server_text() {
        assert_eq!(
            registration_message(&rejected(StatusCode::CONFLICT, Some("Username taken"))),
            "Username taken"
        );
    }

    #[test]
    fn test_registration_message_status_fallbacks() {
        assert_eq!(
            registration_message(&rejected(StatusCode::CONFLICT, None)),
            EMAIL_TAKEN
        );
        assert_eq!(
            registration_message(&rejected(StatusCode::INTERNAL_SERVER_ERROR, None)),
            SERVER_FAILURE
        );
        assert_eq!(
            registration_message(&rejected(StatusCode::BAD_REQUEST, None)),
            REGISTRATION_FAILED
        );
    }

    #[test]
    fn test_view_lists_errors() {
        let mut controller = AuthController::new(AuthMode::Register);
        controller.form_mut().password = SecretString::from("a");
        controller.form_mut().confirm_password = SecretString::from("b");
        controller.form_mut().validate();
        assert_eq!(
            controller.form().field_error(Field::ConfirmPassword),
            Some(lavender_core::auth_form::PASSWORDS_DIFFER)
        );

        let rendered = controller.view().render().unwrap();
        assert!(rendered.contains("Passwords do not match"));
        assert!(rendered.contains("Username is required"));
        assert!(rendered.contains("Email is required"));
    }

    #[test]
    fn test_toggle_keeps_values() {
        let mut controller = AuthController::new(AuthMode::Login);
        controller.form_mut().username = "ana".to_string();
        controller.form_mut().validate();
        controller.toggle_mode();
        assert_eq!(controller.form().mode(), AuthMode::Register);
        assert_eq!(controller.form().username, "ana");
        assert!(controller.form().field_errors().is_empty());
    }
}
