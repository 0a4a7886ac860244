//! Upload acceptance rules.
//!
//! [`validate_file`] is pure: it only looks at the declared size and MIME
//! type. Size is checked before type.

use thiserror::Error;

/// Bytes in one mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Default upload size limit.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * MIB;

/// MIME types accepted when no override is configured.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
    "image/png",
    "image/jpeg",
    "image/gif",
];

/// Reason an upload was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileRejection {
    /// The file is larger than the policy allows.
    #[error("File size exceeds {limit_mb}MB limit")]
    TooLarge {
        /// Declared size in bytes.
        size_bytes: u64,
        /// Limit in whole mebibytes, as shown to the user.
        limit_mb: u64,
    },

    /// The MIME type is not on the allow-list.
    #[error(
        "File type not allowed. Allowed types: PDF, Word, Excel, PowerPoint, text, CSV, and images"
    )]
    TypeNotAllowed {
        /// Declared MIME type.
        mime_type: String,
    },
}

/// Size limit and MIME allow-list applied to uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePolicy {
    max_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|mime| (*mime).to_owned())
                .collect(),
        }
    }
}

impl FilePolicy {
    /// Replaces the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Replaces the MIME allow-list.
    #[must_use]
    pub fn with_allowed_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = mime_types
            .into_iter()
            .map(|mime| mime.into().trim().to_ascii_lowercase())
            .collect();
        self
    }

    /// Returns the size limit in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Returns the accepted MIME types.
    #[must_use]
    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }

    /// Returns whether the MIME type is allowed, ignoring case and
    /// parameters such as `charset`.
    #[must_use]
    pub fn allows(&self, mime_type: &str) -> bool {
        let essence = essence(mime_type);
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }
}

/// Checks a declared upload against `policy`.
///
/// # Errors
///
/// Returns [`FileRejection::TooLarge`] when `size_bytes` exceeds the limit,
/// otherwise [`FileRejection::TypeNotAllowed`] when the MIME type is not
/// allowed.
pub fn validate_file(
    size_bytes: u64,
    mime_type: &str,
    policy: &FilePolicy,
) -> Result<(), FileRejection> {
    if size_bytes > policy.max_bytes {
        return Err(FileRejection::TooLarge {
            size_bytes,
            limit_mb: policy.max_bytes.checked_div(MIB).unwrap_or_default(),
        });
    }
    if !policy.allows(mime_type) {
        return Err(FileRejection::TypeNotAllowed {
            mime_type: mime_type.to_owned(),
        });
    }
    Ok(())
}

fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
