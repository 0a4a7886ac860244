//! In-memory adapters for use-case persistence.

mod use_case;

pub use use_case::InMemoryUseCaseRepository;
