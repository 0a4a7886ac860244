//! Port contracts for attachment storage.

mod store;

pub use store::{ObjectStore, ObjectStoreError, ObjectStoreResult};
