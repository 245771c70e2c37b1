//! Client-local key/value storage.
//!
//! Values are opaque strings that outlive the process. [`FileStorage`] keeps
//! them in a single JSON document under the state directory;
//! [`MemoryStorage`] is used by tests and one-shot tooling.

mod file;
mod memory;

use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage keys for persisted client state.
pub mod keys {
    /// Key for the raw access token.
    pub const TOKEN: &str = "token";

    /// Key for the serialized cart line items.
    pub const CART: &str = "cart";
}

/// Errors from the storage backend itself.
///
/// A value that cannot be parsed by its reader is not a storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key/value store that survives restarts.
pub trait ClientStorage: Send + Sync + Debug {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Shared handle to a storage backend.
pub type SharedStorage = Arc<dyn ClientStorage>;
