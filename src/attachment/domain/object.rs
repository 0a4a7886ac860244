//! Object keys and stored-object metadata.

use crate::use_case::domain::UseCaseId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

const MAX_FILE_NAME_LENGTH: usize = 255;

/// Error returned when an attachment file name is unusable as a key segment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileNameError {
    /// The name is empty after trimming.
    #[error("file name must not be empty")]
    Empty,
    /// The name is `.` or `..` or contains a path separator.
    #[error("file name must be a single path segment: {0}")]
    NotASegment(String),
    /// The name contains control characters.
    #[error("file name contains control characters")]
    ControlCharacter,
    /// The name exceeds the storage limit.
    #[error("file name exceeds {MAX_FILE_NAME_LENGTH} characters")]
    TooLong,
}

/// Single path segment naming an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Validates an attachment file name.
    ///
    /// # Errors
    ///
    /// Returns a [`FileNameError`] for empty names, separators, `.`/`..`,
    /// control characters, or names longer than 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, FileNameError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FileNameError::Empty);
        }
        if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
            return Err(FileNameError::NotASegment(trimmed.to_owned()));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(FileNameError::ControlCharacter);
        }
        if trimmed.chars().count() > MAX_FILE_NAME_LENGTH {
            return Err(FileNameError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slash-separated object-store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Key of a use-case attachment: `use-cases/{id}/{file}`.
    #[must_use]
    pub fn for_attachment(use_case_id: UseCaseId, file_name: &FileName) -> Self {
        Self(format!("{}{file_name}", Self::attachment_prefix(use_case_id)))
    }

    /// Prefix shared by every attachment of a use case, with trailing `/`.
    #[must_use]
    pub fn attachment_prefix(use_case_id: UseCaseId) -> String {
        format!("use-cases/{use_case_id}/")
    }

    /// Rebuilds a key from a directory-style prefix and an entry name.
    pub(crate) fn from_path(directory: &str, name: &str) -> Self {
        if directory.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{directory}/{name}"))
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment of the key.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata describing an object held by an object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Object key.
    pub key: ObjectKey,
    /// Public URL the object can be fetched from.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub content_type: String,
    /// Lowercase hex SHA-256 of the content.
    pub sha256: String,
}

impl StoredObject {
    /// Builds metadata for `contents` stored under `key`.
    #[must_use]
    pub fn describe(key: ObjectKey, url: String, content_type: &str, contents: &[u8]) -> Self {
        Self {
            key,
            url,
            size: u64::try_from(contents.len()).unwrap_or(u64::MAX),
            content_type: content_type.to_owned(),
            sha256: format!("{:x}", Sha256::digest(contents)),
        }
    }
}
