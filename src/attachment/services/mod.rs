//! Application services for attachments.

mod attachments;

pub use attachments::{AttachmentError, AttachmentResult, AttachmentService};
