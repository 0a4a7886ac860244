//! Adapter implementations for the object store port.

mod filesystem;
mod memory;

pub use filesystem::FilesystemObjectStore;
pub use memory::InMemoryObjectStore;
