//! In-memory object store for tests and local runs.

use crate::attachment::{
    domain::{ObjectKey, StoredObject},
    ports::{ObjectStore, ObjectStoreError, ObjectStoreResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Base URL used for objects held in memory.
const MEMORY_BASE_URL: &str = "memory://";

#[derive(Debug, Clone)]
struct MemoryObject {
    metadata: StoredObject,
    contents: Vec<u8>,
}

/// Thread-safe in-memory object store keyed in lexical order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<ObjectKey, MemoryObject>>>,
}

impl InMemoryObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored bytes, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::Storage`] when the lock is poisoned.
    pub fn contents(&self, key: &ObjectKey) -> ObjectStoreResult<Option<Vec<u8>>> {
        let objects = self.objects.read().map_err(lock_error)?;
        Ok(objects.get(key).map(|object| object.contents.clone()))
    }
}

fn lock_error(err: impl ToString) -> ObjectStoreError {
    ObjectStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        contents: &[u8],
    ) -> ObjectStoreResult<StoredObject> {
        let metadata = StoredObject::describe(
            key.clone(),
            format!("{MEMORY_BASE_URL}{key}"),
            content_type,
            contents,
        );
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.insert(
            key.clone(),
            MemoryObject {
                metadata: metadata.clone(),
                contents: contents.to_vec(),
            },
        );
        Ok(metadata)
    }

    async fn delete(&self, key: &ObjectKey) -> ObjectStoreResult<()> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ObjectStoreError::NotFound(key.clone()))
    }

    async fn list(&self, prefix: &str) -> ObjectStoreResult<Vec<StoredObject>> {
        let objects = self.objects.read().map_err(lock_error)?;
        Ok(objects
            .values()
            .filter(|object| object.metadata.key.as_str().starts_with(prefix))
            .map(|object| object.metadata.clone())
            .collect())
    }
}
