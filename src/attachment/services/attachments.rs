//! Service layer for use-case attachments.

use crate::attachment::{
    domain::{
        FileName, FileNameError, FilePolicy, FileRejection, ObjectKey, StoredObject,
        validate_file,
    },
    ports::{ObjectStore, ObjectStoreError},
};
use crate::identity::Actor;
use crate::use_case::{
    domain::UseCaseId,
    ports::{UseCaseRepository, UseCaseRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for attachment operations.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The owning use case does not exist.
    #[error("use case {0} not found")]
    UseCaseNotFound(UseCaseId),
    /// No attachment exists under the requested name.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(ObjectKey),
    /// The file name is not a single path segment.
    #[error(transparent)]
    InvalidFileName(#[from] FileNameError),
    /// The upload failed the file policy.
    #[error(transparent)]
    Rejected(#[from] FileRejection),
    /// Use-case lookup failed.
    #[error(transparent)]
    UseCases(#[from] UseCaseRepositoryError),
    /// Object storage failed.
    #[error(transparent)]
    Store(ObjectStoreError),
}

impl From<ObjectStoreError> for AttachmentError {
    fn from(err: ObjectStoreError) -> Self {
        match err {
            ObjectStoreError::NotFound(key) => Self::AttachmentNotFound(key),
            other => Self::Store(other),
        }
    }
}

/// Result type for attachment service operations.
pub type AttachmentResult<T> = Result<T, AttachmentError>;

/// Validates and stores files attached to use cases.
pub struct AttachmentService<U, S>
where
    U: UseCaseRepository + ?Sized,
    S: ObjectStore + ?Sized,
{
    use_cases: Arc<U>,
    store: Arc<S>,
    policy: FilePolicy,
}

impl<U, S> Clone for AttachmentService<U, S>
where
    U: UseCaseRepository + ?Sized,
    S: ObjectStore + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            use_cases: Arc::clone(&self.use_cases),
            store: Arc::clone(&self.store),
            policy: self.policy.clone(),
        }
    }
}

impl<U, S> AttachmentService<U, S>
where
    U: UseCaseRepository + ?Sized,
    S: ObjectStore + ?Sized,
{
    /// Creates a service applying `policy` to uploads.
    #[must_use]
    pub const fn new(use_cases: Arc<U>, store: Arc<S>, policy: FilePolicy) -> Self {
        Self {
            use_cases,
            store,
            policy,
        }
    }

    /// Returns the upload policy.
    #[must_use]
    pub const fn policy(&self) -> &FilePolicy {
        &self.policy
    }

    /// Stores an attachment for a use case.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::UseCaseNotFound`] for unknown use cases,
    /// then [`AttachmentError::InvalidFileName`] or
    /// [`AttachmentError::Rejected`] for unacceptable uploads, or storage
    /// errors.
    pub async fn upload(
        &self,
        use_case_id: UseCaseId,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
        actor: &Actor,
    ) -> AttachmentResult<StoredObject> {
        self.require_use_case(use_case_id).await?;
        let name = FileName::new(file_name)?;
        let size = u64::try_from(contents.len()).unwrap_or(u64::MAX);
        validate_file(size, content_type, &self.policy).inspect_err(|err| {
            tracing::warn!(use_case_id = %use_case_id, file = %name, error = %err, "upload rejected");
        })?;

        let key = ObjectKey::for_attachment(use_case_id, &name);
        let stored = self.store.put(&key, content_type, contents).await?;
        tracing::info!(
            use_case_id = %use_case_id,
            key = %stored.key,
            size = stored.size,
            actor = %actor,
            "attachment stored"
        );
        Ok(stored)
    }

    /// Lists a use case's attachments, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::UseCaseNotFound`] for unknown use cases or
    /// storage errors.
    pub async fn list(&self, use_case_id: UseCaseId) -> AttachmentResult<Vec<StoredObject>> {
        self.require_use_case(use_case_id).await?;
        Ok(self
            .store
            .list(&ObjectKey::attachment_prefix(use_case_id))
            .await?)
    }

    /// Deletes an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::UseCaseNotFound`],
    /// [`AttachmentError::AttachmentNotFound`], an invalid name, or storage
    /// errors.
    pub async fn delete(
        &self,
        use_case_id: UseCaseId,
        file_name: &str,
        actor: &Actor,
    ) -> AttachmentResult<()> {
        let name = FileName::new(file_name)?;
        self.require_use_case(use_case_id).await?;
        let key = ObjectKey::for_attachment(use_case_id, &name);
        self.store.delete(&key).await?;
        tracing::info!(use_case_id = %use_case_id, key = %key, actor = %actor, "attachment deleted");
        Ok(())
    }

    async fn require_use_case(&self, use_case_id: UseCaseId) -> AttachmentResult<()> {
        self.use_cases
            .find_by_id(use_case_id)
            .await?
            .map(|_| ())
            .ok_or(AttachmentError::UseCaseNotFound(use_case_id))
    }
}
