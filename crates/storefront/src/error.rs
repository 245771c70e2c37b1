//! Unified error handling.
//!
//! Provides a unified `AppError` type for the command surface. Controllers
//! turn recoverable failures into user-facing messages themselves; only
//! failures that end a command surface here.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// REST API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session could not be updated.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A view failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// User input was rejected before any request.
    #[error("{0}")]
    Validation(String),

    /// The screen requires a different role or a signed-in user.
    #[error("{0}")]
    AccessDenied(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation("You must select at least 1 unit.".to_string());
        assert_eq!(err.to_string(), "You must select at least 1 unit.");

        let err = AppError::from(ConfigError::MissingEnvVar("LAVENDER_API_BASE_URL".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: LAVENDER_API_BASE_URL"
        );
    }
}
