//! `PostgreSQL` adapters for use-case persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresUseCaseRepository, UseCasePgPool};
