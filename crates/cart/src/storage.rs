//! Persistence layer for the cart blob.
//!
//! The store treats persistence as an abstract key-value blob store: one
//! fixed namespaced key maps to the serialized cart. `load` reads the whole
//! value (or signals absence), `save` replaces it in full — there is no
//! partial patching and no schema versioning.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read/write failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart blob could not be encoded or decoded.
    #[error("cart blob codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value blob store holding the serialized cart.
///
/// Implementations must replace the whole value on `save`; the store never
/// issues partial writes.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the blob for `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob for `key` with `value`.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// InMemoryStorage
// =============================================================================

/// Volatile blob store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a blob under `key`.
    #[must_use]
    pub fn with_blob(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[async_trait]
impl CartStorage for InMemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::Backend("storage mutex poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::Backend("storage mutex poisoned".to_string()))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// JsonFileStorage
// =============================================================================

/// File-backed blob store: one file per key under a base directory.
///
/// Writes go to a temporary sibling file first and are moved into place
/// with a rename, so a crash mid-write never leaves a truncated blob.
#[derive(Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a file-backed store rooted at `dir`. The directory is created
    /// on first `save` if it does not exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Map a storage key to a file path, replacing characters that are not
    /// filesystem-safe.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl CartStorage for JsonFileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Cart blob written");
        Ok(())
    }
}
