//! Application state shared across screens.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::session::SessionContext;
use crate::storage::{FileStorage, SharedStorage, StorageError};

/// Configuration, storage and API client for one client process.
///
/// Cheaply cloneable; clones share storage and the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    storage: SharedStorage,
    api: ApiClient,
}

impl AppState {
    /// Create state backed by file storage under `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let storage: SharedStorage = Arc::new(FileStorage::new(&config.state_dir));
        Self::with_storage(config, storage)
    }

    /// Create state over an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                api,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a handle to client storage.
    #[must_use]
    pub fn storage(&self) -> SharedStorage {
        Arc::clone(&self.inner.storage)
    }

    /// Get a reference to the anonymous API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Restore the session from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be read.
    pub fn session(&self) -> Result<SessionContext, StorageError> {
        SessionContext::restore(self.storage())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::storage::{MemoryStorage, keys};

    #[test]
    fn test_state_shares_storage() {
        let config = StorefrontConfig::new(Url::parse("http://localhost:5000").unwrap(), "/tmp/unused");
        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        let clone = state.clone();

        state.storage().set(keys::TOKEN, "x").unwrap();
        assert_eq!(clone.storage().get(keys::TOKEN).unwrap().as_deref(), Some("x"));
        assert_eq!(state.api().base_url().as_str(), "http://localhost:5000/");
        assert!(!state.session().unwrap().is_authenticated());
    }
}
