//! In-memory adapters for finding persistence.

mod finding;

pub use finding::InMemoryFindingRepository;
