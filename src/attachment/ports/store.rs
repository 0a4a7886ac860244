//! Object storage port.

use crate::attachment::domain::{ObjectKey, StoredObject};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for object store operations.
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Blob storage addressed by slash-separated keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `contents` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        contents: &[u8],
    ) -> ObjectStoreResult<StoredObject>;

    /// Removes the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::NotFound`] when no object exists.
    async fn delete(&self, key: &ObjectKey) -> ObjectStoreResult<()>;

    /// Lists objects whose key starts with `prefix`, ordered by key.
    ///
    /// `prefix` is a directory-style prefix ending in `/`.
    async fn list(&self, prefix: &str) -> ObjectStoreResult<Vec<StoredObject>>;
}

/// Errors returned by object store implementations.
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    /// No object exists under the key.
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ObjectStoreError {
    /// Wraps a storage backend error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
