//! REST API adapter.
//!
//! All calls go through [`ApiClient`], which attaches the bearer token when one
//! is set and turns every non-success response into [`ApiError::Rejected`]
//! with a single normalized message. Screens never look at raw error bodies.
//!
//! # Endpoints
//!
//! - `POST api/auth/login`, `POST api/auth/register` ([`auth`])
//! - `GET api/products`, `GET api/products/admin` ([`products`])
//! - `GET api/orders`, `POST api/orders` ([`orders`])

pub mod auth;
pub mod orders;
pub mod products;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use lavender_core::pagination::Page;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::StorefrontConfig;

/// Longest error body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 300;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status})")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Normalized server message of a rejected request.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// Server Messages
// =============================================================================

/// A human-readable message extracted from an error body.
///
/// The API reports failures in several shapes:
/// - a bare string (JSON string or plain text)
/// - an array of `{description}` objects, of which the first is used
/// - an object with `message` or `title`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMessage(String);

impl ServerMessage {
    /// Extract a message from a raw response body.
    ///
    /// Returns `None` for empty bodies and for JSON that carries no message.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::String(text)) => Some(text),
            Ok(Value::Array(entries)) => entries.first().and_then(|entry| match entry {
                Value::String(text) => Some(text.clone()),
                other => text_field(other, "description"),
            }),
            Ok(value @ Value::Object(_)) => {
                text_field(&value, "message").or_else(|| text_field(&value, "title"))
            }
            Ok(_) => None,
            Err(_) => Some(body.to_string()),
        };

        message
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// =============================================================================
// Paged Responses
// =============================================================================

/// Listing response; the item list arrives as `productItems` or `items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
    #[serde(default)]
    total: u64,
    product_items: Option<Vec<T>>,
    items: Option<Vec<T>>,
}

/// Listing response read only for its record count.
#[derive(Debug, Deserialize)]
struct TotalOnly {
    #[serde(default)]
    total: u64,
}

impl<T> RawPage<T> {
    /// Products report `productItems` first.
    fn into_product_page(self) -> Page<T> {
        Page {
            items: self.product_items.or(self.items).unwrap_or_default(),
            total: self.total,
        }
    }

    /// Orders report `items` first.
    fn into_order_page(self) -> Page<T> {
        Page {
            items: self.items.or(self.product_items).unwrap_or_default(),
            total: self.total,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<Arc<SecretString>>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base_url.clone(), config.http_timeout)
    }

    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
            token: None,
        })
    }

    /// A clone of this client that sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn authenticated(&self, token: Arc<SecretString>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Some(token),
        }
    }

    /// A clone of this client without a bearer token.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: None,
        }
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path and append non-empty query pairs.
    fn endpoint(&self, path: &str, query: &[(&str, Option<String>)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                if let Some(value) = value {
                    pairs.append_pair(key, value);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.inner.client.get(url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.inner.client.post(url)
    }

    /// Record count of a listing endpoint, read from a one-item first page.
    async fn count(&self, path: &str) -> Result<u64, ApiError> {
        let url = self.endpoint(
            path,
            &[
                ("pageNumber", Some("1".to_string())),
                ("pageSize", Some("1".to_string())),
            ],
        )?;
        let body: TotalOnly = self.send(self.get(url)).await?;
        Ok(body.total)
    }

    /// Send a request and decode a JSON response.
    ///
    /// An empty success body decodes as JSON `null`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                status = %status,
                path = %url,
                body = %excerpt(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Rejected {
                status,
                message: ServerMessage::from_body(&body).map(ServerMessage::into_inner),
            });
        }

        debug!(status = %status, path = %url, "API response received");

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            error!(
                error = %e,
                path = %url,
                body = %excerpt(body),
                "Failed to decode API response"
            );
            ApiError::Decode(e)
        })
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
