//! Domain types for use-case attachments.

mod object;
mod policy;

pub use object::{FileName, FileNameError, ObjectKey, StoredObject};
pub use policy::{
    DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_FILE_BYTES, FilePolicy, FileRejection, MIB,
    validate_file,
};
