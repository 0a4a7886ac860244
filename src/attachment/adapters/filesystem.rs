//! Object store backed by a capability-scoped directory.
//!
//! Object bytes live at `{root}/{key}`. Metadata is kept next to them under
//! `{root}/.meta/{key}.json` so listings report the declared content type.

use crate::attachment::{
    domain::{ObjectKey, StoredObject},
    ports::{ObjectStore, ObjectStoreError, ObjectStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

const METADATA_DIR: &str = ".meta";

/// Filesystem-backed object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    root: Arc<Dir>,
    public_base_url: String,
}

impl FilesystemObjectStore {
    /// Opens (creating if needed) the root directory.
    ///
    /// `public_base_url` is joined with the object key to form object URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::Storage`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path, public_base_url: impl Into<String>) -> ObjectStoreResult<Self> {
        let parent = root
            .parent()
            .filter(|path| !path.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let name = root
            .file_name()
            .ok_or_else(|| ObjectStoreError::storage(io::Error::other("root must name a directory")))?;
        let parent_dir =
            Dir::open_ambient_dir(parent, ambient_authority()).map_err(ObjectStoreError::storage)?;
        parent_dir
            .create_dir_all(name)
            .map_err(ObjectStoreError::storage)?;
        let dir = parent_dir.open_dir(name).map_err(ObjectStoreError::storage)?;
        Ok(Self::from_dir(dir, public_base_url))
    }

    /// Wraps an already-open directory.
    #[must_use]
    pub fn from_dir(dir: Dir, public_base_url: impl Into<String>) -> Self {
        let base: String = public_base_url.into();
        Self {
            root: Arc::new(dir),
            public_base_url: base.trim_end_matches('/').to_owned(),
        }
    }

    fn url_for(&self, key: &ObjectKey) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    async fn run_blocking<F, T>(&self, f: F) -> ObjectStoreResult<T>
    where
        F: FnOnce(&Dir) -> ObjectStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(ObjectStoreError::storage)?
    }
}

fn metadata_path(key: &ObjectKey) -> Utf8PathBuf {
    Utf8Path::new(METADATA_DIR).join(format!("{key}.json"))
}

fn ensure_parent(dir: &Dir, path: &Utf8Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => dir.create_dir_all(parent),
        _ => Ok(()),
    }
}

fn read_metadata(dir: &Dir, key: &ObjectKey) -> ObjectStoreResult<StoredObject> {
    let raw = dir
        .read_to_string(metadata_path(key))
        .map_err(ObjectStoreError::storage)?;
    serde_json::from_str(&raw).map_err(ObjectStoreError::storage)
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        contents: &[u8],
    ) -> ObjectStoreResult<StoredObject> {
        let metadata =
            StoredObject::describe(key.clone(), self.url_for(key), content_type, contents);
        let object_key = key.clone();
        let bytes = contents.to_vec();
        let record = serde_json::to_vec(&metadata).map_err(ObjectStoreError::storage)?;

        self.run_blocking(move |dir| {
            let data_path = Utf8PathBuf::from(object_key.as_str());
            let meta_path = metadata_path(&object_key);
            ensure_parent(dir, &data_path).map_err(ObjectStoreError::storage)?;
            ensure_parent(dir, &meta_path).map_err(ObjectStoreError::storage)?;
            dir.write(&data_path, &bytes)
                .map_err(ObjectStoreError::storage)?;
            dir.write(&meta_path, &record)
                .map_err(ObjectStoreError::storage)?;
            Ok(())
        })
        .await?;
        Ok(metadata)
    }

    async fn delete(&self, key: &ObjectKey) -> ObjectStoreResult<()> {
        let object_key = key.clone();
        self.run_blocking(move |dir| {
            match dir.remove_file(object_key.as_str()) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Err(ObjectStoreError::NotFound(object_key));
                }
                Err(err) => return Err(ObjectStoreError::storage(err)),
            }
            match dir.remove_file(metadata_path(&object_key)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(ObjectStoreError::storage(err)),
            }
        })
        .await
    }

    async fn list(&self, prefix: &str) -> ObjectStoreResult<Vec<StoredObject>> {
        let directory = prefix.trim_end_matches('/').to_owned();
        self.run_blocking(move |dir| {
            let listed = if directory.is_empty() { "." } else { directory.as_str() };
            let entries = match dir.read_dir(listed) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(ObjectStoreError::storage(err)),
            };
            let mut objects = Vec::new();
            for entry in entries {
                let file = entry.map_err(ObjectStoreError::storage)?;
                if !file.file_type().map_err(ObjectStoreError::storage)?.is_file() {
                    continue;
                }
                let name = file.file_name().map_err(ObjectStoreError::storage)?;
                let key = ObjectKey::from_path(&directory, &name);
                objects.push(read_metadata(dir, &key)?);
            }
            objects.sort_by(|left, right| left.key.cmp(&right.key));
            Ok(objects)
        })
        .await
    }
}
