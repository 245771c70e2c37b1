//! Login and registration endpoints.

use lavender_core::auth_form::{Credentials, Registration};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl ApiClient {
    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the credentials are refused, or a
    /// transport/decode error.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<SecretString, ApiError> {
        let url = self.endpoint("api/auth/login", &[])?;
        let body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };

        let response: TokenResponse = self.send(self.post(url).json(&body)).await?;
        info!("Login accepted");
        Ok(SecretString::from(response.token))
    }

    /// Create an account and return the token issued for it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` (409 for a duplicate email, 500 for a
    /// server failure), or a transport/decode error.
    #[instrument(skip(self, registration), fields(username = %registration.credentials.username))]
    pub async fn register(&self, registration: &Registration) -> Result<SecretString, ApiError> {
        let url = self.endpoint("api/auth/register", &[])?;
        let body = RegisterRequest {
            username: &registration.credentials.username,
            password: registration.credentials.password.expose_secret(),
            email: registration.email.as_str(),
        };

        let response: TokenResponse = self.send(self.post(url).json(&body)).await?;
        info!("Registration accepted");
        Ok(SecretString::from(response.token))
    }
}
