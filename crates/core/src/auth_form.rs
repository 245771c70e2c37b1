//! Login/registration form state machine.
//!
//! The form has two modes. Toggling between them clears every error but keeps
//! what the user typed. Validation is synchronous and must pass before any
//! request is issued; submission itself lives in the storefront crate.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};

use crate::types::{Email, EmailError};

pub const USERNAME_REQUIRED: &str = "Username is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";

/// Which action the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    /// Form heading and submit label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
        }
    }

    /// Prompt for switching to the other mode.
    #[must_use]
    pub const fn toggle_prompt(self) -> &'static str {
        match self {
            Self::Login => "No account yet? Register here",
            Self::Register => "Already have an account? Sign in",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

/// Credentials extracted from a validated form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Registration data extracted from a validated form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub credentials: Credentials,
    pub email: Email,
}

/// Login/registration form state.
#[derive(Debug, Clone)]
pub struct AuthForm {
    mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    field_errors: BTreeMap<Field, &'static str>,
    general_error: Option<String>,
    loading: bool,
}

impl AuthForm {
    /// An empty form in the given mode.
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            email: String::new(),
            password: SecretString::from(String::new()),
            confirm_password: SecretString::from(String::new()),
            field_errors: BTreeMap::new(),
            general_error: None,
            loading: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switch between login and registration.
    ///
    /// Clears field errors and the general error; entered values stay.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.other();
        self.field_errors.clear();
        self.general_error = None;
    }

    /// Validation message for `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        self.field_errors.get(&field).copied()
    }

    /// All field errors in field order.
    #[must_use]
    pub const fn field_errors(&self) -> &BTreeMap<Field, &'static str> {
        &self.field_errors
    }

    #[must_use]
    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Show a page-level error message.
    pub fn set_general_error(&mut self, message: impl Into<String>) {
        self.general_error = Some(message.into());
    }

    pub fn clear_general_error(&mut self) {
        self.general_error = None;
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Run validation for the current mode, replacing previous field errors.
    ///
    /// Returns `true` if every field passed.
    pub fn validate(&mut self) -> bool {
        let mut errors = BTreeMap::new();

        if self.username.trim().is_empty() {
            errors.insert(Field::Username, USERNAME_REQUIRED);
        }

        if self.password.expose_secret().is_empty() {
            errors.insert(Field::Password, PASSWORD_REQUIRED);
        }

        if self.mode == AuthMode::Register {
            match Email::parse(&self.email) {
                Ok(_) => {}
                Err(EmailError::Empty) => {
                    errors.insert(Field::Email, EMAIL_REQUIRED);
                }
                Err(EmailError::Malformed) => {
                    errors.insert(Field::Email, EMAIL_INVALID);
                }
            }

            if self.password.expose_secret() != self.confirm_password.expose_secret() {
                errors.insert(Field::ConfirmPassword, PASSWORDS_DIFFER);
            }
        }

        self.field_errors = errors;
        self.field_errors.is_empty()
    }

    /// Username and password as entered.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Registration data, if the email parses.
    #[must_use]
    pub fn registration(&self) -> Option<Registration> {
        Some(Registration {
            credentials: self.credentials(),
            email: Email::parse(&self.email).ok()?,
        })
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new(AuthMode::default())
    }
}
