//! Sign-in, registration and identity commands.

use lavender_core::auth_form::AuthMode;
use lavender_storefront::error::{AppError, Result};
use lavender_storefront::routes::auth::{AuthController, SubmitOutcome};
use lavender_storefront::session::SessionContext;
use lavender_storefront::state::AppState;
use secrecy::SecretString;

use super::{emit, say};

/// Sign in with a username and password.
///
/// # Errors
///
/// Returns `AppError::Validation` with the form's message if sign-in fails.
pub async fn login(state: &AppState, username: String, password: String) -> Result<()> {
    let mut controller = AuthController::new(AuthMode::Login);
    let form = controller.form_mut();
    form.username = username;
    form.password = SecretString::from(password);

    submit(state, controller).await
}

/// Register and sign in.
///
/// # Errors
///
/// Returns `AppError::Validation` with the form's message if registration or
/// the follow-up sign-in fails.
pub async fn register(
    state: &AppState,
    username: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<()> {
    let mut controller = AuthController::new(AuthMode::Register);
    let form = controller.form_mut();
    form.username = username;
    form.email = email;
    form.password = SecretString::from(password);
    form.confirm_password = SecretString::from(confirm_password);

    submit(state, controller).await
}

async fn submit(state: &AppState, mut controller: AuthController) -> Result<()> {
    let mut session = state.session()?;
    match controller.submit(state.api(), &mut session).await {
        SubmitOutcome::SignedIn => signed_in_line(&session),
        SubmitOutcome::Invalid | SubmitOutcome::Failed => {
            emit(&controller.view())?;
            Err(AppError::Validation(
                controller
                    .form()
                    .general_error()
                    .unwrap_or("The form has errors")
                    .to_string(),
            ))
        }
    }
}

fn signed_in_line(session: &SessionContext) -> Result<()> {
    let subject = session
        .claims()
        .and_then(lavender_core::session::Claims::subject)
        .unwrap_or_default();
    say(&format!("Signed in as {subject} ({})", session.role()))
}

/// Sign out, clearing the token and the cart.
///
/// # Errors
///
/// Returns `AppError::Storage` if local state cannot be cleared.
pub fn logout(state: &AppState) -> Result<()> {
    let mut session = state.session()?;
    session.sign_out()?;
    say("Signed out.")
}

/// Show the current identity.
///
/// # Errors
///
/// Returns `AppError::Storage` if local state cannot be read.
pub fn whoami(state: &AppState) -> Result<()> {
    let session = state.session()?;
    let Some(claims) = session.claims() else {
        return say("Not signed in.");
    };

    say(&format!(
        "Subject:  {}",
        claims.subject().unwrap_or_else(|| "-".to_string())
    ))?;
    say(&format!("Role:     {}", claims.role()))?;
    say(&format!(
        "Customer: {}",
        session
            .customer_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string())
    ))?;
    if let Some(expires_at) = claims.expires_at() {
        say(&format!("Expires:  {}", expires_at.format("%Y-%m-%d %H:%M UTC")))?;
    }
    Ok(())
}
